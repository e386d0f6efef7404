//! UseCase layer.
//!
//! Session gate, player and admin actions, and the remote state poller.

pub mod admin_actions;
pub mod auth_gate;
pub mod error;
pub mod game_actions;
pub mod poller;
pub mod validation;

pub use admin_actions::{AdminActions, OverviewSnapshot};
pub use auth_gate::{AuthGate, GateKind, GateOutcome};
pub use error::ActionError;
pub use game_actions::{GameActions, RoomListing};
pub use poller::{PollEvent, PollTarget, Poller};
