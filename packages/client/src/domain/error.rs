//! Domain-level error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("'{0}' is not a valid room id")]
    InvalidRoomId(String),

    #[error("token must not be empty")]
    EmptyToken,

    #[error("unknown leaderboard period '{0}'")]
    InvalidPeriod(String),
}

/// Errors returned by the backend API.
///
/// `Unauthorized` is the only variant that de-authenticates the client;
/// every other variant leaves local state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 401 from any endpoint
    #[error("authentication required")]
    Unauthorized,

    /// Any other non-success status
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    /// Connection, DNS, or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Message suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Network(_) => "Could not reach the game server.".to_string(),
            ApiError::Parse(_) => "The game server sent an unexpected response.".to_string(),
        }
    }
}

/// Result alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Token persistence errors
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to access token file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
