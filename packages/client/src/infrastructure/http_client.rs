//! reqwest implementation of the backend API traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::domain::{
    admin::{
        ActivityEntry, AdminGame, AdminGameDetail, AdminOverview, AdminPlayer, AdminPlayerDetail,
        CleanupTarget, DetailedStats, ExportKind, SystemInfo,
    },
    api::{AdminApi, GameApi, Reconnection},
    entity::{
        ContinueOutcome, GameHistoryEntry, LeaderboardEntry, NewRoom, Registration, Room, Round,
        RoundResults, Session, User, UserRooms,
    },
    error::{ApiError, ApiResult},
    value_object::{AuthToken, LeaderboardPeriod, PlayerId, RoomId},
};

use super::dto::http as dto;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// REST client for the game backend
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        with_token(self.client.get(self.url(path)), token)
    }

    fn post(&self, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        with_token(self.client.post(self.url(path)), token)
    }

    /// Sends the request and maps non-success statuses to `ApiError`.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> ApiResult<T> {
        let response = self.send(self.get(path, token)).await?;
        parse_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, token: Option<&AuthToken>, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send(self.post(path, token).json(body)).await?;
        parse_json(response).await
    }

    /// POST with an empty JSON object, discarding the response body.
    async fn post_action(&self, path: &str, token: &AuthToken) -> ApiResult<()> {
        self.send(self.post(path, Some(token)).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }
}

fn with_token(request: RequestBuilder, token: Option<&AuthToken>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTHORIZATION, token.header_value()),
        None => request,
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// First human-readable message in a backend error body.
///
/// Accepts `{"error": ".."}`, `{"message": ".."}`, `{"detail": ".."}` and
/// field error maps such as `{"password": ["too short"]}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    first_message(&value)
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        Value::Object(map) => ["error", "message", "detail", "non_field_errors"]
            .iter()
            .find_map(|key| map.get(*key).and_then(first_message))
            .or_else(|| map.values().find_map(first_message)),
        _ => None,
    }
}

fn room_path(room_id: RoomId, action: &str) -> String {
    if action.is_empty() {
        format!("/api/rooms/{}/", room_id)
    } else {
        format!("/api/rooms/{}/{}/", room_id, action)
    }
}

#[async_trait]
impl GameApi for RestClient {
    async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        let body = dto::LoginRequest { username, password };
        let response: dto::AuthResponseDto =
            self.post_json("/api/auth/login/", None, &body).await?;
        Session::try_from(response)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<Session> {
        let response: dto::AuthResponseDto = self
            .post_json("/api/auth/register/", None, registration)
            .await?;
        Session::try_from(response)
    }

    async fn logout(&self, token: &AuthToken) -> ApiResult<()> {
        self.post_action("/api/auth/logout/", token).await
    }

    async fn profile(&self, token: &AuthToken) -> ApiResult<User> {
        let profile: dto::ProfileDto = self.get_json("/api/auth/profile/", Some(token)).await?;
        Ok(profile.into())
    }

    async fn check_reconnection(&self, token: &AuthToken) -> ApiResult<Option<Reconnection>> {
        let response: dto::ReconnectionDto = self
            .get_json("/api/auth/check-reconnection/", Some(token))
            .await?;
        Ok(response.into())
    }

    async fn list_rooms(&self, token: &AuthToken) -> ApiResult<Vec<Room>> {
        let rooms: Vec<dto::RoomDto> = self.get_json("/api/rooms/", Some(token)).await?;
        Ok(rooms.into_iter().map(Room::from).collect())
    }

    async fn user_rooms(&self, token: &AuthToken) -> ApiResult<UserRooms> {
        let rooms: dto::UserRoomsDto = self.get_json("/api/rooms/user/", Some(token)).await?;
        Ok(rooms.into())
    }

    async fn create_room(&self, token: &AuthToken, room: &NewRoom) -> ApiResult<Room> {
        let created: dto::RoomDto = self
            .post_json("/api/rooms/create/", Some(token), room)
            .await?;
        Ok(created.into())
    }

    async fn get_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<Room> {
        let room: dto::RoomDto = self.get_json(&room_path(room_id, ""), Some(token)).await?;
        Ok(room.into())
    }

    async fn join_room(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        nickname: &str,
    ) -> ApiResult<Room> {
        let body = dto::JoinRequest { nickname };
        let joined: dto::JoinResponseDto = self
            .post_json(&room_path(room_id, "join"), Some(token), &body)
            .await?;
        Ok(joined.room.into())
    }

    async fn join_by_code(
        &self,
        token: &AuthToken,
        code: &str,
        nickname: &str,
    ) -> ApiResult<Room> {
        let body = dto::JoinByCodeRequest {
            room_code: code,
            nickname,
        };
        let joined: dto::JoinResponseDto = self
            .post_json("/api/rooms/join-by-code/", Some(token), &body)
            .await?;
        Ok(joined.room.into())
    }

    async fn leave_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&room_path(room_id, "leave"), token).await
    }

    async fn ping_activity(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&room_path(room_id, "activity"), token)
            .await
    }

    async fn start_game(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&room_path(room_id, "start"), token).await
    }

    async fn close_room(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&room_path(room_id, "close"), token).await
    }

    async fn current_round(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<Option<Round>> {
        match self
            .get_json::<dto::RoundDto>(&room_path(room_id, "current-round"), Some(token))
            .await
        {
            Ok(round) => Ok(Some(round.into())),
            Err(ApiError::Rejected { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn submit_answer(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        answer: i64,
    ) -> ApiResult<()> {
        let body = dto::AnswerRequest { answer };
        self.send(
            self.post(&room_path(room_id, "submit-answer"), Some(token))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn start_voting(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&room_path(room_id, "start-voting"), token)
            .await
    }

    async fn submit_vote(
        &self,
        token: &AuthToken,
        room_id: RoomId,
        accused: PlayerId,
    ) -> ApiResult<()> {
        let body = dto::VoteRequest {
            accused_player_id: accused.0,
        };
        self.send(
            self.post(&room_path(room_id, "submit-vote"), Some(token))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn continue_round(
        &self,
        token: &AuthToken,
        room_id: RoomId,
    ) -> ApiResult<ContinueOutcome> {
        let response: dto::ContinueDto = self
            .post_json(
                &room_path(room_id, "continue"),
                Some(token),
                &serde_json::json!({}),
            )
            .await?;
        ContinueOutcome::try_from(response)
    }

    async fn round_results(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<RoundResults> {
        let results: dto::RoundResultsDto = self
            .get_json(&room_path(room_id, "results"), Some(token))
            .await?;
        Ok(results.into())
    }

    async fn game_history(&self, token: &AuthToken) -> ApiResult<Vec<GameHistoryEntry>> {
        self.get_json("/api/stats/history/", Some(token)).await
    }

    async fn leaderboard(
        &self,
        token: &AuthToken,
        period: LeaderboardPeriod,
        limit: u32,
    ) -> ApiResult<Vec<LeaderboardEntry>> {
        let limit = limit.to_string();
        let request = self
            .get("/api/leaderboard/", Some(token))
            .query(&[("period", period.as_query()), ("limit", limit.as_str())]);
        let entries: Vec<dto::LeaderboardDto> = parse_json(self.send(request).await?).await?;
        Ok(entries.into_iter().map(LeaderboardEntry::from).collect())
    }
}

#[async_trait]
impl AdminApi for RestClient {
    async fn overview(&self, token: &AuthToken) -> ApiResult<AdminOverview> {
        self.get_json("/api/admin/overview/", Some(token)).await
    }

    async fn recent_activity(&self, token: &AuthToken) -> ApiResult<Vec<ActivityEntry>> {
        self.get_json("/api/admin/recent-activity/", Some(token))
            .await
    }

    async fn players(&self, token: &AuthToken) -> ApiResult<Vec<AdminPlayer>> {
        self.get_json("/api/admin/players/", Some(token)).await
    }

    async fn player_detail(
        &self,
        token: &AuthToken,
        player_id: i64,
    ) -> ApiResult<AdminPlayerDetail> {
        self.get_json(&format!("/api/admin/players/{}/", player_id), Some(token))
            .await
    }

    async fn set_player_active(
        &self,
        token: &AuthToken,
        player_id: i64,
        active: bool,
    ) -> ApiResult<()> {
        let action = if active { "activate" } else { "deactivate" };
        self.post_action(
            &format!("/api/admin/players/{}/{}/", player_id, action),
            token,
        )
        .await
    }

    async fn games(&self, token: &AuthToken) -> ApiResult<Vec<AdminGame>> {
        self.get_json("/api/admin/games/", Some(token)).await
    }

    async fn game_detail(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<AdminGameDetail> {
        self.get_json(&format!("/api/admin/games/{}/", room_id), Some(token))
            .await
    }

    async fn end_game(&self, token: &AuthToken, room_id: RoomId) -> ApiResult<()> {
        self.post_action(&format!("/api/admin/games/{}/end/", room_id), token)
            .await
    }

    async fn stats(&self, token: &AuthToken) -> ApiResult<DetailedStats> {
        self.get_json("/api/admin/stats/", Some(token)).await
    }

    async fn system_info(&self, token: &AuthToken) -> ApiResult<SystemInfo> {
        self.get_json("/api/admin/system-info/", Some(token)).await
    }

    async fn cleanup(&self, token: &AuthToken, target: CleanupTarget) -> ApiResult<String> {
        let response: dto::MessageDto = self
            .post_json(
                &format!("/api/admin/{}/", target.path_segment()),
                Some(token),
                &serde_json::json!({}),
            )
            .await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Cleanup complete".to_string()))
    }

    async fn export(&self, token: &AuthToken, kind: ExportKind) -> ApiResult<String> {
        let response = self
            .send(self.get(
                &format!("/api/admin/export/{}/", kind.path_segment()),
                Some(token),
            ))
            .await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
