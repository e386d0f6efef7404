//! Host detection.
//!
//! Endpoints populate host identity inconsistently: some send the host as a
//! nested user, some as a bare id, and membership records may or may not
//! carry `is_host`. Every signal is collected and OR-ed together.

use super::entity::{Room, User};

/// The independent signals that may mark the current user as host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostSignals {
    /// `user.id == room.host`
    pub matches_room_host: bool,
    /// The user's own membership record has `is_host`
    pub self_player_flag: bool,
    /// Global staff privilege (close-room only)
    pub staff_override: bool,
}

impl HostSignals {
    pub fn collect(user: &User, room: &Room) -> Self {
        Self {
            matches_room_host: room.host_id == Some(user.id),
            self_player_flag: room.player_for(user.id).is_some_and(|p| p.is_host),
            staff_override: user.is_staff,
        }
    }

    /// Host-only controls such as "Start Game".
    pub fn is_host(&self) -> bool {
        self.matches_room_host || self.self_player_flag
    }

    /// "Close Room" is also available to staff.
    pub fn can_close_room(&self) -> bool {
        self.is_host() || self.staff_override
    }
}
