//! UseCase: session / auth gate
//!
//! Validates the cached token on startup, performs login, registration and
//! logout, and owns the "clear everything" path used by the global 401
//! handler.

use std::sync::Arc;

use crate::domain::{AuthToken, GameApi, Reconnection, Registration, Session, TokenStore};

use super::{
    error::ActionError,
    validation::{validate_credentials, validate_registration},
};

pub const ADMIN_ACCESS_REQUIRED: &str = "Admin access required";

/// Which client the gate guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Player,
    /// Rejects users lacking both staff and superuser flags
    Admin,
}

/// Result of validating the cached token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Authenticated(Session),
    /// No token, or the token was not accepted
    Unauthenticated,
    /// Valid token, but the user may not use this client
    Rejected(String),
}

pub struct AuthGate {
    api: Arc<dyn GameApi>,
    store: Arc<dyn TokenStore>,
    kind: GateKind,
}

impl AuthGate {
    pub fn new(api: Arc<dyn GameApi>, store: Arc<dyn TokenStore>, kind: GateKind) -> Self {
        Self { api, store, kind }
    }

    /// Validates the cached token via a profile fetch.
    ///
    /// Any failure clears the token; this never returns an error.
    pub async fn initialize(&self) -> GateOutcome {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return GateOutcome::Unauthenticated,
            Err(e) => {
                tracing::warn!("Failed to read token: {}", e);
                return GateOutcome::Unauthenticated;
            }
        };

        match self.api.profile(&token).await {
            Ok(user) => {
                let session = Session { token, user };
                match self.admit(&session) {
                    Ok(()) => GateOutcome::Authenticated(session),
                    Err(message) => {
                        self.invalidate().await;
                        GateOutcome::Rejected(message)
                    }
                }
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    tracing::debug!("Token validation failed: {}", e);
                }
                self.invalidate().await;
                GateOutcome::Unauthenticated
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ActionError> {
        validate_credentials(username, password)?;
        let session = self.api.login(username.trim(), password).await?;
        self.establish(session).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session, ActionError> {
        validate_registration(registration)?;
        let session = self.api.register(registration).await?;
        self.establish(session).await
    }

    /// Best-effort server logout followed by local teardown.
    pub async fn logout(&self, token: &AuthToken) {
        if let Err(e) = self.api.logout(token).await {
            tracing::debug!("Logout request failed: {}", e);
        }
        self.invalidate().await;
    }

    /// Clears the persisted token. Used on logout and on any 401.
    pub async fn invalidate(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("Failed to clear token: {}", e);
        }
    }

    /// Room the server offers to resume. Only a 401 is returned as an
    /// error; other failures are swallowed.
    pub async fn check_reconnection(
        &self,
        token: &AuthToken,
    ) -> Result<Option<Reconnection>, ActionError> {
        match self.api.check_reconnection(token).await {
            Ok(reconnection) => Ok(reconnection),
            Err(e) if e.is_unauthorized() => Err(e.into()),
            Err(e) => {
                tracing::debug!("Reconnection check failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn establish(&self, session: Session) -> Result<Session, ActionError> {
        if let Err(message) = self.admit(&session) {
            return Err(ActionError::Forbidden(message));
        }
        self.store.save(&session.token).await?;
        tracing::info!("Logged in as {}", session.user.username);
        Ok(session)
    }

    fn admit(&self, session: &Session) -> Result<(), String> {
        match self.kind {
            GateKind::Player => Ok(()),
            GateKind::Admin if session.user.has_admin_access() => Ok(()),
            GateKind::Admin => Err(ADMIN_ACCESS_REQUIRED.to_string()),
        }
    }
}
