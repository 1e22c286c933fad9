//! Authentication module for obtaining and caching the API token.
//!
//! This module provides:
//! - `CredentialPrompt`: source of username, password and OTP code
//! - `TerminalPrompt`: interactive implementation with hidden password input
//! - `TokenStore`: the token file under the per-user config directory
//!
//! Tokens do not expire client-side; a cached token is reused until the
//! caller clears it.

pub mod error;
pub mod prompt;
pub mod token_store;

pub use error::TokenStoreError;
pub use prompt::{CredentialPrompt, TerminalPrompt};
pub use token_store::TokenStore;
