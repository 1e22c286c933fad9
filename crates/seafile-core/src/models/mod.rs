//! Data models for Seafile entities.
//!
//! - `ShareLink`, `OrphanedLink`, `UploadLink`: link records
//! - `RepoSummary`: reduced projection of an admin library record
//! - `Account`: account listing entry

pub mod account;
pub mod link;
pub mod repo;

pub use account::Account;
pub use link::{OrphanedLink, ShareLink, UploadLink};
pub use repo::{RepoSummary, RepoSummaryPage};
