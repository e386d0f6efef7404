//! In-memory token store, used by tests and throwaway sessions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AuthToken, TokenStore, TokenStoreError};

#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<AuthToken>>>,
}

impl InMemoryTokenStore {
    pub fn new(token: Option<AuthToken>) -> Self {
        Self {
            token: Arc::new(Mutex::new(token)),
        }
    }

    /// Current value, for assertions.
    pub async fn current(&self) -> Option<AuthToken> {
        self.token.lock().await.clone()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        *self.token.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().await = None;
        Ok(())
    }
}
