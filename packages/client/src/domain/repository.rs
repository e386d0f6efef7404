//! Token store trait.
//!
//! The session token is the only state the client persists between runs.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::{error::TokenStoreError, value_object::AuthToken};

/// Persistence for the bearer token
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when no token has been stored
    async fn load(&self) -> Result<Option<AuthToken>, TokenStoreError>;

    async fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError>;

    /// Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}
