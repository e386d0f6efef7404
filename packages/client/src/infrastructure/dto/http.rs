//! HTTP request and response DTOs for the game backend.
//!
//! Response shapes differ between endpoints (the host is sometimes a nested
//! user and sometimes a bare id, `is_host` is often absent), so most fields
//! are defaulted and the conversions in `conversion.rs` normalize them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{entity::RoomStatus, value_object::RoomId};

// ========================================
// Requests
// ========================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JoinRequest<'a> {
    pub nickname: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JoinByCodeRequest<'a> {
    pub room_code: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnswerRequest {
    pub answer: i64,
}

#[derive(Debug, Serialize)]
pub struct VoteRequest {
    pub accused_player_id: i64,
}

// ========================================
// Responses: accounts
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// `/api/auth/profile/` wraps the user in a stats envelope; older
/// deployments return the user directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfileDto {
    Wrapped { user: UserDto },
    Flat(UserDto),
}

#[derive(Debug, Deserialize)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct ReconnectionDto {
    pub can_reconnect: bool,
    #[serde(default)]
    pub room: Option<RoomDto>,
}

// ========================================
// Responses: rooms
// ========================================

/// A reference to an account: either a bare id or an object with an id
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserRefDto {
    Id(i64),
    Object { id: i64 },
}

impl UserRefDto {
    pub fn id(&self) -> i64 {
        match self {
            UserRefDto::Id(id) | UserRefDto::Object { id } => *id,
        }
    }
}

fn default_connected() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDto {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserRefDto>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub nickname: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default = "default_connected")]
    pub is_connected: bool,
    #[serde(default)]
    pub is_host: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomDto {
    pub id: RoomId,
    pub name: String,
    pub status: RoomStatus,
    #[serde(default)]
    pub host: Option<UserRefDto>,
    #[serde(default)]
    pub players: Vec<PlayerDto>,
    pub max_players: u32,
    pub total_rounds: u32,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub room_code: Option<String>,
    #[serde(default)]
    pub current_user_player: Option<PlayerDto>,
}

#[derive(Debug, Deserialize)]
pub struct JoinResponseDto {
    pub room: RoomDto,
}

#[derive(Debug, Deserialize)]
pub struct UserRoomsDto {
    #[serde(default)]
    pub current_room: Option<RoomDto>,
    #[serde(default)]
    pub recent_games: Vec<RoomDto>,
}

// ========================================
// Responses: gameplay
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDto {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerDto {
    pub player: PlayerDto,
    pub answer: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteDto {
    pub voter: PlayerDto,
    pub accused: PlayerDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundDto {
    pub round_number: u32,
    /// Missing or null on some responses
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub question: Option<QuestionDto>,
    /// The question variant addressed to the requesting player
    #[serde(default)]
    pub player_question: Option<QuestionDto>,
    #[serde(default)]
    pub answers: Vec<AnswerDto>,
    #[serde(default)]
    pub votes: Vec<VoteDto>,
    #[serde(default)]
    pub user_has_answered: bool,
    #[serde(default)]
    pub user_has_voted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealedAnswerDto {
    pub player_id: i64,
    pub player_nickname: String,
    pub answer: i64,
    #[serde(default)]
    pub is_imposter: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoundOutcomeDto {
    #[serde(default)]
    pub imposter_nickname: String,
    #[serde(default)]
    pub imposter_caught: bool,
    #[serde(default)]
    pub most_voted_player_nickname: Option<String>,
    #[serde(default)]
    pub total_votes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundResultsDto {
    pub round_number: u32,
    pub question_text: String,
    #[serde(default)]
    pub decoy_question_text: String,
    #[serde(default)]
    pub answers_with_players: Vec<RevealedAnswerDto>,
    #[serde(default)]
    pub results: RoundOutcomeDto,
    /// nickname -> score
    #[serde(default)]
    pub current_scores: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
pub struct ContinueDto {
    #[serde(default)]
    pub game_ended: bool,
    #[serde(default)]
    pub next_round: Option<u32>,
}

// ========================================
// Responses: stats
// ========================================

#[derive(Debug, Deserialize)]
pub struct LeaderboardUserDto {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardDto {
    pub user: LeaderboardUserDto,
    pub rank: u32,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_wins: u32,
    #[serde(default)]
    pub win_rate: f64,
}

/// `{"message": "..."}` acknowledgements
#[derive(Debug, Deserialize)]
pub struct MessageDto {
    #[serde(default)]
    pub message: Option<String>,
}
