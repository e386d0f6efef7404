//! UseCase layer errors.

use thiserror::Error;

use crate::domain::{ApiError, TokenStoreError};

/// Failure of a user-initiated action
#[derive(Debug, Error)]
pub enum ActionError {
    /// Blocked locally before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The action does not apply in the current state (no active room, ...)
    #[error("{0}")]
    NotAvailable(String),

    /// Authenticated, but not allowed into this client
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        ActionError::Validation(message.into())
    }

    /// Only a backend 401 de-authenticates the client.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Api(e) if e.is_unauthorized())
    }

    /// Message suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Api(e) => e.user_message(),
            ActionError::Validation(m) | ActionError::NotAvailable(m) | ActionError::Forbidden(m) => {
                m.clone()
            }
            ActionError::Store(e) => e.to_string(),
        }
    }
}
