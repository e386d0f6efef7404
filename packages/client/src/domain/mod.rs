//! Domain layer.
//!
//! Client-side entities, the phase state machine, and the pure reconciler.
//! The API traits the outer layers implement are defined here as well.

pub mod admin;
pub mod api;
pub mod entity;
pub mod error;
pub mod host;
pub mod phase;
pub mod reconciler;
pub mod repository;
pub mod value_object;
pub mod view;

pub use api::{AdminApi, GameApi, Reconnection};
pub use entity::{
    ContinueOutcome, GameHistoryEntry, LeaderboardEntry, NewRoom, Player, Registration, Room,
    RoomStatus, Round, RoundResults, RoundStatus, Session, User, UserRooms,
};
pub use error::{ApiError, ApiResult, TokenStoreError, ValueObjectError};
pub use host::HostSignals;
pub use phase::{Phase, PhaseEvent, SubPanel};
pub use reconciler::{MIN_PLAYERS_TO_START, ReconcileInput, Reconciled, reconcile};
pub use repository::TokenStore;
pub use value_object::{AuthToken, LeaderboardPeriod, PlayerId, RoomId, UserId};
pub use view::{Control, Notification, NotificationLevel, PendingActions, Screen};

#[cfg(test)]
pub use api::{MockAdminApi, MockGameApi};
#[cfg(test)]
pub use repository::MockTokenStore;
