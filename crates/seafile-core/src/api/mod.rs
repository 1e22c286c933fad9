//! REST API client module for Seafile servers.
//!
//! This module provides the `SeafileClient` for talking to the Seafile
//! web API: token logon, share and upload links, admin library and
//! account listings, and search.
//!
//! Authenticated calls send `Authorization: Token <token>`, where the
//! token comes from `/api2/auth-token/`.

pub mod client;
pub mod error;

pub use client::SeafileClient;
pub use error::ApiError;
