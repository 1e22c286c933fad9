use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_staff: Option<bool>,
}

/// Union of two account listings by email, keeping first-seen order.
///
/// Every email of `primary` comes first, followed by the emails of
/// `secondary` that `primary` did not already contain.
pub fn merge_account_emails(primary: &[Account], secondary: &[Account]) -> Vec<String> {
    let mut emails: Vec<String> = Vec::with_capacity(primary.len() + secondary.len());
    for account in primary.iter().chain(secondary) {
        if !emails.iter().any(|e| e == &account.email) {
            emails.push(account.email.clone());
        }
    }
    emails
}
