use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be invalid or revoked")]
    Unauthorized,

    #[error("Not authenticated - log on before calling {0}")]
    NotAuthenticated(&'static str),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No library matches name {0:?}")]
    RepoNotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Connection to {url} timed out")]
    Timeout { url: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server returned an HTML error page instead of a token")]
    HtmlErrorPage,

    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    #[error("Failed to read credentials: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Classify a transport error, pulling timeouts out as their own variant.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else {
            ApiError::NetworkError(err)
        }
    }

    /// True for errors that mean the cached token should be discarded.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized | ApiError::HtmlErrorPage | ApiError::AuthRejected(_)
        )
    }
}
