//! Client-side copies of server-owned entities.
//!
//! Everything here is a read-mostly snapshot of the last backend response.
//! The backend is the system of record; nothing in this module enforces
//! server-side invariants.

use serde::{Deserialize, Serialize};

use super::value_object::{AuthToken, PlayerId, RoomId, UserId};

/// Authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    /// Staff or superuser accounts may use the admin dashboard.
    pub fn has_admin_access(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Token plus the user it belongs to. One per controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Finished,
}

impl RoomStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::InProgress => "in progress",
            RoomStatus::Finished => "finished",
        }
    }
}

/// Room membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: Option<UserId>,
    pub nickname: String,
    pub score: i64,
    pub is_connected: bool,
    /// Not every endpoint populates this; absent means `false`.
    pub is_host: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    /// Host account id. Some endpoints send a nested user, some a bare id,
    /// some nothing at all.
    pub host_id: Option<UserId>,
    pub players: Vec<Player>,
    pub max_players: u32,
    pub total_rounds: u32,
    pub current_round: u32,
    pub is_private: bool,
    pub room_code: Option<String>,
    /// The requesting user's own membership, when the endpoint includes it.
    pub current_user_player: Option<Player>,
}

impl Room {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The membership record for `user_id`, preferring the dedicated
    /// `current_user_player` field over a scan of `players`.
    pub fn player_for(&self, user_id: UserId) -> Option<&Player> {
        self.current_user_player
            .as_ref()
            .filter(|p| p.user_id.is_none() || p.user_id == Some(user_id))
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.user_id == Some(user_id))
            })
    }
}

/// Round status as reported by the backend.
///
/// Values outside the four playable states are kept verbatim so the
/// reconciler can fail safe instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStatus {
    Answering,
    Discussion,
    Voting,
    Results,
    Unknown(String),
}

impl From<&str> for RoundStatus {
    fn from(value: &str) -> Self {
        match value {
            "answering" => RoundStatus::Answering,
            "discussion" => RoundStatus::Discussion,
            "voting" => RoundStatus::Voting,
            "results" => RoundStatus::Results,
            other => RoundStatus::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundAnswer {
    pub player_id: PlayerId,
    pub nickname: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundVote {
    pub voter_id: PlayerId,
    pub accused_id: PlayerId,
}

/// The active round of an in-progress room, from the requesting user's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub number: u32,
    pub status: RoundStatus,
    /// Question shown to this user (the imposter receives the decoy).
    pub question_text: Option<String>,
    pub answers: Vec<RoundAnswer>,
    pub votes: Vec<RoundVote>,
    pub user_has_answered: bool,
    pub user_has_voted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedAnswer {
    pub player_id: PlayerId,
    pub nickname: String,
    pub value: i64,
    pub is_imposter: bool,
}

/// Outcome of a finished round, including the imposter reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResults {
    pub round_number: u32,
    pub question_text: String,
    pub decoy_question_text: String,
    pub answers: Vec<RevealedAnswer>,
    pub imposter_nickname: String,
    pub imposter_caught: bool,
    pub most_voted_nickname: Option<String>,
    pub total_votes: u32,
    /// (nickname, score), highest first
    pub scores: Vec<(String, i64)>,
}

/// Result of continuing past a results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueOutcome {
    NextRound(u32),
    GameEnded,
}

/// The user's current room and recently finished ones
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRooms {
    pub current_room: Option<Room>,
    pub recent_games: Vec<Room>,
}

/// Form data for room creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRoom {
    pub name: String,
    pub max_players: u32,
    pub total_rounds: u32,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Form data for account registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// One line of the user's per-round history
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameHistoryEntry {
    pub room_name: String,
    pub round_number: u32,
    pub role: String,
    pub result: String,
    pub points_earned: i64,
    #[serde(default)]
    pub was_voted_out: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub total_score: i64,
    pub total_games: u32,
    pub total_wins: u32,
    pub win_rate: f64,
}
