use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{CredentialPrompt, TokenStoreError};
use crate::api::SeafileClient;
use crate::config;

/// Token file name in the app config directory
const TOKEN_FILE: &str = "apitoken";

/// Plain-text token cache. The first line of the file is the token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `%APPDATA%\seafile-python` on Windows, `$HOME/.config/seafile-python`
    /// everywhere else.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        let dir = config::app_config_dir().ok_or(TokenStoreError::NoConfigDir)?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    /// Read the cached token, if any.
    pub fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let path = self.token_path();
        if !path.is_file() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(TokenStoreError::io(&path))?;
        match contents.lines().next() {
            Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
            _ => {
                warn!(path = %path.display(), "Token file is empty, ignoring it");
                Ok(None)
            }
        }
    }

    /// Write `token` to the cache, creating the directory if needed.
    pub fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        std::fs::create_dir_all(&self.dir).map_err(TokenStoreError::io(&self.dir))?;
        let path = self.token_path();
        std::fs::write(&path, token).map_err(TokenStoreError::io(&path))?;
        info!(path = %path.display(), "API token cached");
        Ok(())
    }

    /// Remove the cached token. Missing files are not an error.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).map_err(TokenStoreError::io(&path))?;
            debug!(path = %path.display(), "Token cache cleared");
        }
        Ok(())
    }

    /// Install the cached token on `client`, or log on and cache the result.
    ///
    /// The prompt is only consulted when no usable token is cached.
    pub async fn load_or_logon<P>(
        &self,
        client: &mut SeafileClient,
        prompt: &mut P,
    ) -> Result<String, TokenStoreError>
    where
        P: CredentialPrompt + ?Sized,
    {
        std::fs::create_dir_all(&self.dir).map_err(TokenStoreError::io(&self.dir))?;

        if let Some(token) = self.load()? {
            debug!("Using cached API token");
            client.set_token(token.clone());
            return Ok(token);
        }

        let token = client.logon(prompt).await?;
        self.save(&token)?;
        Ok(token)
    }
}
