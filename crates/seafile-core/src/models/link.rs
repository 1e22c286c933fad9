//! Share and upload link records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A share link as returned by `/api/v2.1/share-links/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub token: String,
    pub link: String,
    #[serde(default)]
    pub repo_id: Option<String>,
    pub repo_name: String,
    pub path: String,
    #[serde(default)]
    pub expire_date: Option<String>,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub obj_name: Option<String>,
    #[serde(default)]
    pub is_dir: Option<bool>,
    #[serde(default)]
    pub ctime: Option<String>,
    #[serde(default)]
    pub view_cnt: Option<i64>,
}

impl ShareLink {
    /// Parse the expiry date. Links without one never expire.
    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        self.expire_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
    }

    /// Library name joined with the path inside it.
    pub fn location(&self) -> String {
        format!("{}{}", self.repo_name, self.path)
    }

    /// Reduce an expired link to what the orphan report needs.
    pub fn to_orphaned(&self) -> Option<OrphanedLink> {
        if !self.is_expired {
            return None;
        }
        Some(OrphanedLink {
            token: self.token.clone(),
            location: self.location(),
            expire_date: self.expire_date.clone(),
        })
    }
}

/// An expired share link that still exists on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedLink {
    pub token: String,
    pub location: String,
    pub expire_date: Option<String>,
}

/// An upload link as returned by `/api/v2.1/upload-links/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLink {
    pub token: String,
    pub link: String,
    #[serde(default)]
    pub repo_id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub expire_date: Option<String>,
}
