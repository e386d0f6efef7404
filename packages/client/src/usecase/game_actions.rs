//! UseCase: player actions
//!
//! Each action validates its local preconditions and then issues exactly one
//! REST call. Pending flags and toasts are the controller's concern; nothing
//! here retries.

use std::sync::Arc;

use crate::domain::{
    AuthToken, ContinueOutcome, GameApi, GameHistoryEntry, LeaderboardEntry, LeaderboardPeriod,
    NewRoom, PlayerId, Room, RoomId, RoundResults, User, UserRooms,
};

use super::{
    error::ActionError,
    validation::{
        normalize_room_code, parse_answer, validate_new_room, validate_nickname, validate_start,
        validate_vote,
    },
};

pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;

/// Room listing shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomListing {
    pub mine: UserRooms,
    pub available: Vec<Room>,
}

pub struct GameActions {
    api: Arc<dyn GameApi>,
}

impl GameActions {
    pub fn new(api: Arc<dyn GameApi>) -> Self {
        Self { api }
    }

    pub async fn create_room(&self, token: &AuthToken, form: NewRoom) -> Result<Room, ActionError> {
        validate_new_room(&form)?;
        let nickname = form
            .nickname
            .as_deref()
            .map(validate_nickname)
            .transpose()?;
        let form = NewRoom {
            name: form.name.trim().to_string(),
            nickname,
            ..form
        };
        let room = self.api.create_room(token, &form).await?;
        tracing::info!("Created room {} ({})", room.name, room.id);
        Ok(room)
    }

    pub async fn join_room(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        nickname: &str,
    ) -> Result<Room, ActionError> {
        let nickname = validate_nickname(nickname)?;
        Ok(self.api.join_room(token, room_id, &nickname).await?)
    }

    pub async fn join_by_code(
        &self,
        token: &AuthToken,
        code: &str,
        nickname: &str,
    ) -> Result<Room, ActionError> {
        let code = normalize_room_code(code)?;
        let nickname = validate_nickname(nickname)?;
        Ok(self.api.join_by_code(token, &code, &nickname).await?)
    }

    pub async fn leave_room(&self, token: &AuthToken, room_id: RoomId) -> Result<(), ActionError> {
        Ok(self.api.leave_room(token, room_id).await?)
    }

    /// Uses the last polled player count for the local check.
    pub async fn start_game(&self, token: &AuthToken, room: &Room) -> Result<(), ActionError> {
        validate_start(room.player_count())?;
        Ok(self.api.start_game(token, room.id).await?)
    }

    pub async fn close_room(&self, token: &AuthToken, room_id: RoomId) -> Result<(), ActionError> {
        Ok(self.api.close_room(token, room_id).await?)
    }

    /// Returns the submitted value.
    pub async fn submit_answer(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        input: &str,
    ) -> Result<i64, ActionError> {
        let answer = parse_answer(input)?;
        self.api.submit_answer(token, room_id, answer).await?;
        Ok(answer)
    }

    pub async fn start_voting(&self, token: &AuthToken, room_id: RoomId) -> Result<(), ActionError> {
        Ok(self.api.start_voting(token, room_id).await?)
    }

    /// Returns the accused player.
    pub async fn submit_vote(
        &self,
        token: &AuthToken,
        room: &Room,
        user: &User,
        selection: &[PlayerId],
    ) -> Result<PlayerId, ActionError> {
        let self_id = room.player_for(user.id).map(|p| p.id);
        let accused = validate_vote(selection, self_id)?;
        if !room.players.iter().any(|p| p.id == accused) {
            return Err(ActionError::validation("That player is not in this room"));
        }
        self.api.submit_vote(token, room.id, accused).await?;
        Ok(accused)
    }

    pub async fn continue_round(
        &self,
        token: &AuthToken,
        room_id: RoomId,
    ) -> Result<ContinueOutcome, ActionError> {
        Ok(self.api.continue_round(token, room_id).await?)
    }

    pub async fn round_results(
        &self,
        token: &AuthToken,
        room_id: RoomId,
    ) -> Result<RoundResults, ActionError> {
        Ok(self.api.round_results(token, room_id).await?)
    }

    pub async fn get_room(&self, token: &AuthToken, room_id: RoomId) -> Result<Room, ActionError> {
        Ok(self.api.get_room(token, room_id).await?)
    }

    /// The user's own rooms and the open ones, for the dashboard.
    pub async fn room_listing(&self, token: &AuthToken) -> Result<RoomListing, ActionError> {
        let mine = self.api.user_rooms(token).await?;
        let available = self.api.list_rooms(token).await?;
        Ok(RoomListing { mine, available })
    }

    pub async fn history(&self, token: &AuthToken) -> Result<Vec<GameHistoryEntry>, ActionError> {
        Ok(self.api.game_history(token).await?)
    }

    pub async fn leaderboard(
        &self,
        token: &AuthToken,
        period: LeaderboardPeriod,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, ActionError> {
        if limit == 0 {
            return Err(ActionError::validation("Limit must be at least 1"));
        }
        Ok(self.api.leaderboard(token, period, limit).await?)
    }
}
