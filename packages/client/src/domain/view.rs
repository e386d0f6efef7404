//! View-models produced by the reconciler and the controllers.
//!
//! A renderer only ever sees these types; it never sees raw backend data.

use super::{
    admin::{
        ActivityEntry, AdminGame, AdminGameDetail, AdminOverview, AdminPlayer, AdminPlayerDetail,
        DetailedStats, SystemInfo,
    },
    entity::{GameHistoryEntry, LeaderboardEntry, RoomStatus, RoundResults},
    phase::SubPanel,
    value_object::{LeaderboardPeriod, PlayerId, RoomId},
};

/// State of one actionable control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Not rendered at all
    Hidden,
    /// Rendered but not usable, with the reason as label
    Disabled(String),
    Enabled(String),
    /// Action dispatched, awaiting the next poll
    Pending(String),
}

impl Control {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Control::Hidden)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Control::Enabled(_))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Control::Hidden => None,
            Control::Disabled(label) | Control::Enabled(label) | Control::Pending(label) => {
                Some(label)
            }
        }
    }
}

/// Optimistic locks set after a successful dispatch.
///
/// Cleared wholesale on the next reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingActions {
    pub start_game: bool,
    pub close_room: bool,
    pub answer: bool,
    pub start_voting: bool,
    pub vote: bool,
    pub continue_round: bool,
}

impl PendingActions {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    pub player_id: PlayerId,
    pub nickname: String,
    pub score: i64,
    pub is_host: bool,
    pub is_connected: bool,
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyView {
    pub room_id: RoomId,
    pub room_name: String,
    pub room_code: Option<String>,
    pub player_count: usize,
    pub max_players: u32,
    pub total_rounds: u32,
    pub players: Vec<PlayerLine>,
    pub start_game: Control,
    pub close_room: Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLine {
    pub nickname: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCandidate {
    pub player_id: PlayerId,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundView {
    pub room_id: RoomId,
    pub room_name: String,
    pub round_number: u32,
    pub total_rounds: u32,
    /// `None` when the round is missing or its status is not playable
    pub panel: Option<SubPanel>,
    pub question: Option<String>,
    pub answer: Control,
    /// Sorted ascending by value
    pub answers: Vec<AnswerLine>,
    pub start_voting: Control,
    pub candidates: Vec<VoteCandidate>,
    pub vote: Control,
    pub votes_cast: usize,
    pub voters_expected: usize,
    pub results: Option<RoundResults>,
    pub continue_round: Control,
    pub scoreboard: Vec<PlayerLine>,
    pub close_room: Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResultsView {
    pub room_name: String,
    /// (nickname, score), highest first
    pub standings: Vec<(String, i64)>,
    pub last_round: Option<RoundResults>,
}

/// Player dashboard panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardPanel {
    Rooms,
    History,
    Leaderboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLine {
    pub room_id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    pub player_count: usize,
    pub max_players: u32,
    pub is_private: bool,
    pub is_member: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardContent {
    Loading,
    Rooms {
        current: Option<RoomLine>,
        available: Vec<RoomLine>,
    },
    History(Vec<GameHistoryEntry>),
    Leaderboard {
        period: LeaderboardPeriod,
        entries: Vec<LeaderboardEntry>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub username: String,
    pub panel: DashboardPanel,
    pub content: DashboardContent,
}

/// Everything the player client can show
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Dashboard(DashboardView),
    Lobby(LobbyView),
    Playing(RoundView),
    Results(FinalResultsView),
}

/// Admin dashboard panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminPanel {
    Overview,
    Players,
    Games,
    Stats,
    System,
}

/// Everything the admin client can show
#[derive(Debug, Clone, PartialEq)]
pub enum AdminScreen {
    Login,
    Loading(AdminPanel),
    Overview {
        overview: AdminOverview,
        activity: Vec<ActivityEntry>,
    },
    Players(Vec<AdminPlayer>),
    PlayerDetail(AdminPlayerDetail),
    Games(Vec<AdminGame>),
    GameDetail(AdminGameDetail),
    Stats(DetailedStats),
    System(SystemInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient toast message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at_millis: i64,
}
