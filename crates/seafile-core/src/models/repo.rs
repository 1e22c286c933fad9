use serde::{Deserialize, Serialize};

/// Reduced view of a library from the admin listing.
///
/// The admin endpoint returns many more fields; only these are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub file_count: i64,
    #[serde(default)]
    pub size: i64,
}

/// Envelope of `/api/v2.1/admin/libraries/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummaryPage {
    #[serde(default)]
    pub repos: Vec<RepoSummary>,
}

/// Entry of `/api2/repos/?nameContains=`, used to resolve names to ids.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepoRef {
    pub id: String,
}
