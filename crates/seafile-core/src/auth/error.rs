use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Token cache I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Logon failed: {0}")]
    Auth(#[from] ApiError),
}

impl TokenStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| TokenStoreError::Io { path, source }
    }
}
