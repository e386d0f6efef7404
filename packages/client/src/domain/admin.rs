//! Admin dashboard entities.
//!
//! These are flat listings with no client-side invariants, so they are
//! deserialized directly from the backend payloads.

use serde::Deserialize;

use super::{entity::RoomStatus, value_object::RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct AdminOverview {
    pub total_users: u64,
    pub total_games: u64,
    pub active_games: u64,
    pub total_rounds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminPlayer {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub last_active: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminPlayerDetail {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub last_active: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub total_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminHost {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminGame {
    pub id: RoomId,
    pub name: String,
    pub host: AdminHost,
    pub player_count: u32,
    pub max_players: u32,
    pub status: RoomStatus,
    pub current_round: u32,
    pub total_rounds: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminGamePlayer {
    pub id: i64,
    pub nickname: String,
    pub user: String,
    pub is_connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminGameDetail {
    #[serde(flatten)]
    pub game: AdminGame,
    #[serde(default)]
    pub players: Vec<AdminGamePlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopPlayer {
    pub username: String,
    pub total_score: i64,
    #[serde(default)]
    pub games_played: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct DetailedStats {
    #[serde(default)]
    pub top_players: Vec<TopPlayer>,
    #[serde(default)]
    pub avg_game_duration: Option<f64>,
    #[serde(default)]
    pub avg_players_per_game: Option<f64>,
    #[serde(default)]
    pub imposter_win_rate: Option<f64>,
    #[serde(default)]
    pub most_active_hour: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct SystemInfo {
    #[serde(default)]
    pub total_tables: u32,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub db_size: Option<String>,
    #[serde(default)]
    pub recent_logs: Vec<String>,
}

/// Maintenance jobs exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTarget {
    Sessions,
    Games,
}

impl CleanupTarget {
    pub fn path_segment(&self) -> &'static str {
        match self {
            CleanupTarget::Sessions => "cleanup-sessions",
            CleanupTarget::Games => "cleanup-games",
        }
    }
}

/// Exportable datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Players,
    Games,
}

impl ExportKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ExportKind::Players => "players",
            ExportKind::Games => "games",
        }
    }
}
