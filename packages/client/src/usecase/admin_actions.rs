//! UseCase: admin dashboard loads and mutations

use std::sync::Arc;

use crate::domain::{
    AdminApi, ApiError, AuthToken, RoomId,
    admin::{
        ActivityEntry, AdminGame, AdminGameDetail, AdminOverview, AdminPlayer, AdminPlayerDetail,
        CleanupTarget, DetailedStats, ExportKind, SystemInfo,
    },
};

use super::error::ActionError;

/// Overview panel data, fetched together on every refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewSnapshot {
    pub overview: AdminOverview,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Clone)]
pub struct AdminActions {
    api: Arc<dyn AdminApi>,
}

impl AdminActions {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub async fn overview(&self, token: &AuthToken) -> Result<OverviewSnapshot, ActionError> {
        let overview = self.api.overview(token).await?;
        let activity = self.api.recent_activity(token).await?;
        Ok(OverviewSnapshot { overview, activity })
    }

    pub async fn players(&self, token: &AuthToken) -> Result<Vec<AdminPlayer>, ActionError> {
        Ok(self.api.players(token).await?)
    }

    pub async fn player_detail(
        &self,
        token: &AuthToken,
        player_id: i64,
    ) -> Result<AdminPlayerDetail, ActionError> {
        Ok(self.api.player_detail(token, player_id).await?)
    }

    pub async fn set_player_active(
        &self,
        token: &AuthToken,
        player_id: i64,
        active: bool,
    ) -> Result<(), ActionError> {
        self.api.set_player_active(token, player_id, active).await?;
        tracing::info!(
            "Player {} {}",
            player_id,
            if active { "activated" } else { "deactivated" }
        );
        Ok(())
    }

    pub async fn games(&self, token: &AuthToken) -> Result<Vec<AdminGame>, ActionError> {
        Ok(self.api.games(token).await?)
    }

    pub async fn game_detail(
        &self,
        token: &AuthToken,
        room_id: RoomId,
    ) -> Result<AdminGameDetail, ActionError> {
        Ok(self.api.game_detail(token, room_id).await?)
    }

    pub async fn end_game(&self, token: &AuthToken, room_id: RoomId) -> Result<(), ActionError> {
        self.api.end_game(token, room_id).await?;
        tracing::info!("Game {} ended by admin", room_id);
        Ok(())
    }

    pub async fn stats(&self, token: &AuthToken) -> Result<DetailedStats, ActionError> {
        Ok(self.api.stats(token).await?)
    }

    pub async fn system_info(&self, token: &AuthToken) -> Result<SystemInfo, ActionError> {
        Ok(self.api.system_info(token).await?)
    }

    pub async fn cleanup(
        &self,
        token: &AuthToken,
        target: CleanupTarget,
    ) -> Result<String, ActionError> {
        Ok(self.api.cleanup(token, target).await?)
    }

    /// Exported JSON, validated and pretty-printed.
    pub async fn export(&self, token: &AuthToken, kind: ExportKind) -> Result<String, ActionError> {
        let raw = self.api.export(token, kind).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| ActionError::Api(ApiError::Parse(e.to_string())))?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| ActionError::Api(ApiError::Parse(e.to_string())))
    }
}
