//! File-backed token store.
//!
//! The token is kept as a single line of plain text. A missing file means
//! "no token".

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::domain::{AuthToken, TokenStore, TokenStoreError};

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            // A blank file is treated like a missing one
            Ok(content) => Ok(AuthToken::new(content).ok()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, token.as_str())
            .await
            .map_err(|e| self.io_error(e))
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
