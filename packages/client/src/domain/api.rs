//! Backend API traits.
//!
//! The usecase and ui layers depend on these traits only; the reqwest
//! implementation lives in the infrastructure layer.

use async_trait::async_trait;

use super::{
    admin::{
        ActivityEntry, AdminGame, AdminGameDetail, AdminOverview, AdminPlayer, AdminPlayerDetail,
        CleanupTarget, DetailedStats, ExportKind, SystemInfo,
    },
    entity::{
        ContinueOutcome, GameHistoryEntry, LeaderboardEntry, NewRoom, Registration, Room, Round,
        RoundResults, Session, User, UserRooms,
    },
    error::ApiResult,
    value_object::{AuthToken, LeaderboardPeriod, PlayerId, RoomId},
};

/// Room the server offers to resume after a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconnection {
    pub room_id: RoomId,
    pub room_name: String,
    pub room_status: String,
}

/// Player-facing REST surface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ApiResult<Session>;

    async fn register(&self, registration: &Registration) -> ApiResult<Session>;

    async fn logout(&self, token: &AuthToken) -> ApiResult<()>;

    async fn profile(&self, token: &AuthToken) -> ApiResult<User>;

    /// `None` when there is nothing to resume
    async fn check_reconnection(&self, token: &AuthToken) -> ApiResult<Option<Reconnection>>;

    async fn list_rooms(&self, token: &AuthToken) -> ApiResult<Vec<Room>>;

    async fn user_rooms(&self, token: &AuthToken) -> ApiResult<UserRooms>;

    async fn create_room(&self, token: &AuthToken, room: &NewRoom) -> ApiResult<Room>;

    async fn get_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<Room>;

    async fn join_room(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        nickname: &str,
    ) -> ApiResult<Room>;

    async fn join_by_code(&self, token: &AuthToken, code: &str, nickname: &str)
    -> ApiResult<Room>;

    async fn leave_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    /// Presence ping. Callers treat failures as best-effort.
    async fn ping_activity(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    async fn start_game(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    async fn close_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    /// `None` when the room has no active round yet
    async fn current_round(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<Option<Round>>;

    async fn submit_answer(&self, token: &AuthToken, room_id: RoomId, answer: i64)
    -> ApiResult<()>;

    async fn start_voting(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    async fn submit_vote(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        accused: PlayerId,
    ) -> ApiResult<()>;

    async fn continue_round(&self, token: &AuthToken, room_id: RoomId)
    -> ApiResult<ContinueOutcome>;

    async fn round_results(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<RoundResults>;

    async fn game_history(&self, token: &AuthToken) -> ApiResult<Vec<GameHistoryEntry>>;

    async fn leaderboard(
        &self,
        token: &AuthToken,
        period: LeaderboardPeriod,
        limit: u32,
    ) -> ApiResult<Vec<LeaderboardEntry>>;
}

/// Staff-only REST surface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn overview(&self, token: &AuthToken) -> ApiResult<AdminOverview>;

    async fn recent_activity(&self, token: &AuthToken) -> ApiResult<Vec<ActivityEntry>>;

    async fn players(&self, token: &AuthToken) -> ApiResult<Vec<AdminPlayer>>;

    async fn player_detail(&self, token: &AuthToken, player_id: i64)
    -> ApiResult<AdminPlayerDetail>;

    async fn set_player_active(
        &self,
        token: &AuthToken,
        player_id: i64,
        active: bool,
    ) -> ApiResult<()>;

    async fn games(&self, token: &AuthToken) -> ApiResult<Vec<AdminGame>>;

    async fn game_detail(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<AdminGameDetail>;

    async fn end_game(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()>;

    async fn stats(&self, token: &AuthToken) -> ApiResult<DetailedStats>;

    async fn system_info(&self, token: &AuthToken) -> ApiResult<SystemInfo>;

    /// Returns the server's summary message
    async fn cleanup(&self, token: &AuthToken, target: CleanupTarget) -> ApiResult<String>;

    /// Returns the raw exported JSON document
    async fn export(&self, token: &AuthToken, kind: ExportKind) -> ApiResult<String>;
}
