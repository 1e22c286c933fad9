//! Seafile REST API client.
//!
//! This crate wraps the parts of the Seafile web API needed to manage
//! share links and inspect a server as an administrator:
//!
//! - `SeafileClient`: request dispatcher, token logon and endpoint methods
//! - `TokenStore`: per-user cache of the API token so logon happens once
//! - `CredentialPrompt`: where usernames, passwords and OTP codes come from
//! - `Config`: optional on-disk settings (host, timeout, last username)
//!
//! A typical session:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use seafile_core::{SeafileClient, TerminalPrompt, TokenStore};
//!
//! let mut client = SeafileClient::new("cloud.example.org")?;
//! let store = TokenStore::default_location()?;
//! store.load_or_logon(&mut client, &mut TerminalPrompt::new()).await?;
//!
//! for link in client.list_orphaned_links().await? {
//!     println!("{} {}", link.token, link.location);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, SeafileClient};
pub use auth::{CredentialPrompt, TerminalPrompt, TokenStore, TokenStoreError};
pub use config::Config;
pub use models::{Account, OrphanedLink, RepoSummary, ShareLink, UploadLink};
