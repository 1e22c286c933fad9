//! API client for communicating with the Seafile REST API.
//!
//! This module provides the `SeafileClient` struct: a thin request
//! dispatcher, the token logon flow, and one method per endpoint.

use std::fmt;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use crate::auth::CredentialPrompt;
use crate::config::{Config, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::models::account::merge_account_emails;
use crate::models::repo::RepoRef;
use crate::models::{Account, OrphanedLink, RepoSummary, RepoSummaryPage, ShareLink, UploadLink};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

const AUTH_TOKEN_PATH: &str = "/api2/auth-token/";
const SHARE_LINKS_PATH: &str = "/api/v2.1/share-links/";
const UPLOAD_LINKS_PATH: &str = "/api/v2.1/upload-links/";
const REPOS_PATH: &str = "/api2/repos/";
const SEARCH_PATH: &str = "/api2/search/";
const ACCOUNTS_PATH: &str = "/api2/accounts/";
const ADMIN_SHARE_LINKS_PATH: &str = "/api/v2.1/admin/share-links/";

/// The admin listing is not paginated further than this first page.
const ADMIN_LIBRARIES_PATH: &str = "/api/v2.1/admin/libraries/?page=1&per_page=100";

/// Query switching the account listing from the LDAP scope to the local DB.
const DB_SCOPE_QUERY: &str = "?scope=DB&limit=-1";

const ACCEPT_JSON: &str = "application/json; indent=4";
const ACCEPT_JSON_UTF8: &str = "application/json; charset=utf-8; indent=4";

/// Header carrying the two-factor code on the second logon attempt.
/// Must be lowercase for `HeaderName::from_static`.
const OTP_HEADER: &str = "x-seafile-otp";

/// Marker in the auth response when the account has two-factor auth enabled.
const TWO_FACTOR_MISSING: &str = "Two factor auth token is missing.";

/// Characters left unescaped in path segments and query values.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@');

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedShareLink {
    link: String,
}

/// Form body for share and upload link creation.
type Form<'a> = Vec<(&'static str, &'a str)>;

/// API client for a Seafile server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SeafileClient {
    client: Client,
    host: String,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for SeafileClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeafileClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SeafileClient {
    /// Create a client for `host`, without a token.
    ///
    /// A bare host name gets `https://`; a host that already carries an
    /// `http://` or `https://` scheme is used as given.
    pub fn new(host: &str) -> Result<Self, ApiError> {
        Self::with_timeout(host, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(host: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            host: host.to_string(),
            base_url: Self::base_url_for(host),
            token: None,
        })
    }

    /// Create a client from the config file's host and timeout.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let host = config
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ApiError::InvalidConfig("no host configured".to_string()))?;
        Self::with_timeout(host, Duration::from_secs(config.request_timeout_secs()))
    }

    /// Create a client that already holds `token`.
    pub fn with_token(host: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        let mut client = Self::new(host)?;
        client.set_token(token);
        Ok(client)
    }

    fn base_url_for(host: &str) -> String {
        let host = host.trim().trim_end_matches('/');
        if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the token used for authenticated requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Headers for an authenticated call. Fails if no token is held.
    fn auth_headers(
        &self,
        accept: Option<&'static str>,
        caller: &'static str,
    ) -> Result<header::HeaderMap, ApiError> {
        let token = self
            .token
            .as_deref()
            .ok_or(ApiError::NotAuthenticated(caller))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Token {}", token))?,
        );
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, header::HeaderValue::from_static(accept));
        }
        Ok(headers)
    }

    // ===== Request Dispatch =====

    /// Issue `method` against `base_url + path` and return the body text.
    ///
    /// The body is returned whatever the HTTP status. Without `headers` the
    /// request carries no `Authorization` header.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: Option<header::HeaderMap>,
    ) -> Result<String, ApiError> {
        let (_, body) = self.send(method, path, form, headers).await?;
        Ok(body)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: Option<header::HeaderMap>,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        if let Some(form) = form {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;

        debug!(%method, url = %url, status = status.as_u16(), "Request completed");
        Ok((status, body))
    }

    /// Dispatch, reject non-success statuses, and decode the JSON body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: header::HeaderMap,
    ) -> Result<T, ApiError> {
        let (status, body) = self.send(method, path, form, Some(headers)).await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    // ===== Authentication =====

    /// Obtain a token by logging on with credentials from `prompt`.
    ///
    /// A client that already holds a token returns it without prompting.
    /// Two-factor accounts are asked for an OTP code and the logon is
    /// retried once with it.
    pub async fn logon<P>(&mut self, prompt: &mut P) -> Result<String, ApiError>
    where
        P: CredentialPrompt + ?Sized,
    {
        if let Some(ref token) = self.token {
            return Ok(token.clone());
        }

        let username = prompt.username().map_err(ApiError::Prompt)?;
        let password = prompt.password().map_err(ApiError::Prompt)?;
        let form = [("username", username.as_str()), ("password", password.as_str())];

        let mut body = self
            .request(Method::POST, AUTH_TOKEN_PATH, Some(&form[..]), None)
            .await?;

        if body.contains(TWO_FACTOR_MISSING) {
            debug!("Server requested a two-factor code");
            let otp = prompt.otp_code().map_err(ApiError::Prompt)?;

            let mut headers = header::HeaderMap::new();
            headers.insert(OTP_HEADER, header::HeaderValue::from_str(otp.trim())?);

            body = self
                .request(Method::POST, AUTH_TOKEN_PATH, Some(&form[..]), Some(headers))
                .await?;
        }

        let token = Self::parse_token_response(&body)?;
        info!(username = %username, host = %self.host, "Logged on");
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Crude check for a web server error page where JSON was expected.
    fn looks_like_html_error(body: &str) -> bool {
        body.to_ascii_lowercase().contains("<!doctype html")
    }

    fn parse_token_response(body: &str) -> Result<String, ApiError> {
        if Self::looks_like_html_error(body) {
            warn!("Auth endpoint returned an HTML page");
            return Err(ApiError::HtmlErrorPage);
        }

        let rejected = || ApiError::AuthRejected(ApiError::truncate_body(body));
        let auth: AuthResponse = serde_json::from_str(body).map_err(|_| rejected())?;
        match auth.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(rejected()),
        }
    }

    // ===== Share Links =====

    /// Fetch every share link owned by the current user
    pub async fn list_share_links(&self) -> Result<Vec<ShareLink>, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON_UTF8), "list_share_links")?;
        self.fetch_json(Method::GET, SHARE_LINKS_PATH, None, headers)
            .await
    }

    /// Share links past their expiry date, in server order
    pub async fn list_orphaned_links(&self) -> Result<Vec<OrphanedLink>, ApiError> {
        let links = self.list_share_links().await?;
        let orphaned: Vec<OrphanedLink> = links.iter().filter_map(ShareLink::to_orphaned).collect();
        debug!(total = links.len(), orphaned = orphaned.len(), "Filtered expired share links");
        Ok(orphaned)
    }

    /// Create a download link for `path` in the library named `repo_name`.
    ///
    /// Returns the link URL.
    pub async fn create_share_link(
        &self,
        repo_name: &str,
        path: &str,
        password: Option<&str>,
        expire_days: Option<u32>,
    ) -> Result<String, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "create_share_link")?;
        let repo_id = self.repo_id_by_name(repo_name).await?;

        let expire = expire_days.filter(|d| *d > 0).map(|d| d.to_string());
        let form = Self::link_form(&repo_id, path, password, expire.as_deref());

        let created: CreatedShareLink = self
            .fetch_json(Method::POST, SHARE_LINKS_PATH, Some(form.as_slice()), headers)
            .await?;
        info!(repo = repo_name, path = path, "Share link created");
        Ok(created.link)
    }

    /// Create an upload link for `path` in the library named `repo_name`.
    pub async fn create_upload_link(
        &self,
        repo_name: &str,
        path: &str,
        password: Option<&str>,
        expire_days: Option<u32>,
    ) -> Result<UploadLink, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "create_upload_link")?;
        let repo_id = self.repo_id_by_name(repo_name).await?;

        let expire = expire_days.filter(|d| *d > 0).map(|d| d.to_string());
        let form = Self::link_form(&repo_id, path, password, expire.as_deref());

        let created: UploadLink = self
            .fetch_json(Method::POST, UPLOAD_LINKS_PATH, Some(form.as_slice()), headers)
            .await?;
        info!(repo = repo_name, path = path, "Upload link created");
        Ok(created)
    }

    fn link_form<'a>(
        repo_id: &'a str,
        path: &'a str,
        password: Option<&'a str>,
        expire_days: Option<&'a str>,
    ) -> Form<'a> {
        let mut form: Form<'a> = vec![("path", path), ("repo_id", repo_id)];
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            form.push(("password", password));
        }
        if let Some(expire_days) = expire_days {
            form.push(("expire_days", expire_days));
        }
        form
    }

    /// Delete a share link. Returns the raw response body.
    pub async fn delete_share_link(&self, token: &str) -> Result<String, ApiError> {
        let headers = self.auth_headers(None, "delete_share_link")?;
        let path = format!("{}{}", SHARE_LINKS_PATH, encode(token));
        let body = self
            .request(Method::DELETE, &path, None, Some(headers))
            .await?;
        debug!(token = token, "Share link deleted");
        Ok(body)
    }

    // ===== Libraries =====

    /// Resolve a library name to its id using the first name match.
    pub async fn repo_id_by_name(&self, name: &str) -> Result<String, ApiError> {
        let headers = self.auth_headers(None, "repo_id_by_name")?;
        let path = format!("{}?nameContains={}", REPOS_PATH, encode(name));

        let repos: Vec<RepoRef> = self.fetch_json(Method::GET, &path, None, headers).await?;
        repos
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| ApiError::RepoNotFound(name.to_string()))
    }

    /// Fetch all libraries on the server (admin only, first 100)
    pub async fn admin_list_repos(&self) -> Result<Vec<RepoSummary>, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "admin_list_repos")?;
        let page: RepoSummaryPage = self
            .fetch_json(Method::GET, ADMIN_LIBRARIES_PATH, None, headers)
            .await?;
        Ok(page.repos)
    }

    /// Share link details for a link token (admin only)
    pub async fn admin_repo_share_links(
        &self,
        repo_token: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "admin_repo_share_links")?;
        let path = format!("{}{}/", ADMIN_SHARE_LINKS_PATH, encode(repo_token));
        self.fetch_json(Method::GET, &path, None, headers).await
    }

    // ===== Accounts =====

    /// Emails of all accounts, LDAP-scoped ones first, then local DB ones.
    pub async fn admin_list_accounts(&self) -> Result<Vec<String>, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "admin_list_accounts")?;

        let ldap: Vec<Account> = self
            .fetch_json(Method::GET, ACCOUNTS_PATH, None, headers.clone())
            .await?;

        let db_path = format!("{}{}", ACCOUNTS_PATH, DB_SCOPE_QUERY);
        let db: Vec<Account> = self.fetch_json(Method::GET, &db_path, None, headers).await?;

        debug!(ldap = ldap.len(), db = db.len(), "Fetched account listings");
        Ok(merge_account_emails(&ldap, &db))
    }

    pub async fn admin_account_info(&self, email: &str) -> Result<serde_json::Value, ApiError> {
        let headers = self.auth_headers(Some(ACCEPT_JSON), "admin_account_info")?;
        let path = format!("{}{}/", ACCOUNTS_PATH, encode(email));
        self.fetch_json(Method::GET, &path, None, headers).await
    }

    // ===== Search =====

    /// Full-text search across all libraries. Returns the raw response body.
    pub async fn search(&self, query: &str) -> Result<String, ApiError> {
        let headers = self.auth_headers(None, "search")?;
        let path = format!("{}?q={}&search_repo=all", SEARCH_PATH, encode(query));
        self.request(Method::GET, &path, None, Some(headers)).await
    }
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, URL_COMPONENT).to_string()
}
