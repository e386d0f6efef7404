//! Local UI phase state machine.
//!
//! The phase is derived from polled server state. `transition` is total:
//! every (phase, event) pair has a defined result, and pairs that do not
//! appear in the table leave the phase unchanged.

use super::entity::{RoomStatus, RoundStatus};

/// Top-level screen the player client is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Auth,
    Dashboard,
    Lobby,
    Playing,
    Results,
}

/// Inputs that may move the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Token validated, or login/register succeeded
    Authenticated,
    /// 401 from any request, logout, or admin rejection
    AuthLost,
    /// User selected, created, or joined a room from the dashboard
    RoomEntered(RoomStatus),
    /// A poll tick returned the active room
    RoomPolled(RoomStatus),
    /// User dismissed the final results
    ResultsAcknowledged,
    /// User left the room (or it disappeared)
    LeftRoom,
}

impl Phase {
    /// The room phase that corresponds to a room status.
    pub fn for_room_status(status: RoomStatus) -> Phase {
        match status {
            RoomStatus::Waiting => Phase::Lobby,
            RoomStatus::InProgress => Phase::Playing,
            RoomStatus::Finished => Phase::Results,
        }
    }

    pub fn transition(self, event: PhaseEvent) -> Phase {
        use Phase::*;
        use PhaseEvent::*;

        match (self, event) {
            (_, AuthLost) => Auth,
            (Auth, Authenticated) => Dashboard,
            (Dashboard, RoomEntered(status)) => Phase::for_room_status(status),
            (Lobby, RoomPolled(RoomStatus::InProgress)) => Playing,
            (Lobby, RoomPolled(RoomStatus::Finished)) => Results,
            (Playing, RoomPolled(RoomStatus::Finished)) => Results,
            (Playing, RoomPolled(RoomStatus::Waiting)) => Lobby,
            (Results, ResultsAcknowledged) => Dashboard,
            (Lobby | Playing | Results, LeftRoom) => Dashboard,
            (current, _) => current,
        }
    }

    /// Phases bound to an active room (the game poller runs in these).
    pub fn is_room_phase(self) -> bool {
        matches!(self, Phase::Lobby | Phase::Playing | Phase::Results)
    }

    /// Only `Playing` polls the current round.
    pub fn polls_round(self) -> bool {
        matches!(self, Phase::Playing)
    }
}

/// Panel shown inside `Playing`, one per playable round status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubPanel {
    Answering,
    Discussion,
    Voting,
    Results,
}

impl SubPanel {
    /// `None` for unknown or missing statuses: nothing is shown.
    pub fn from_round_status(status: &RoundStatus) -> Option<SubPanel> {
        match status {
            RoundStatus::Answering => Some(SubPanel::Answering),
            RoundStatus::Discussion => Some(SubPanel::Discussion),
            RoundStatus::Voting => Some(SubPanel::Voting),
            RoundStatus::Results => Some(SubPanel::Results),
            RoundStatus::Unknown(_) => None,
        }
    }
}
