//! Admin client controller.
//!
//! One panel at a time through the router. Only the Overview panel refreshes
//! on a timer; the timer is stopped whenever another panel is shown.

use std::{path::PathBuf, sync::Arc, time::Duration};

use numberhunt_shared::time::Clock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        AdminApi, AuthToken, GameApi, Notification, NotificationLevel, RoomId, Session,
        TokenStore,
        admin::{CleanupTarget, ExportKind},
        view::{AdminPanel, AdminScreen},
    },
    usecase::{
        ActionError, AdminActions, AuthGate, GateKind, GateOutcome, OverviewSnapshot, Poller,
    },
};

use super::{
    command::{ADMIN_HELP, AdminCommand},
    controller::Flow,
    render::Renderer,
    router::{LoadTicket, ViewRouter},
};

/// Result of one timed overview refresh
#[derive(Debug)]
pub struct OverviewRefresh {
    ticket: LoadTicket<AdminPanel>,
    result: Result<OverviewSnapshot, ActionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminConfirm {
    Deactivate(i64),
    EndGame(RoomId),
    Cleanup(CleanupTarget),
}

pub struct AdminController {
    gate: AuthGate,
    actions: AdminActions,
    renderer: Arc<dyn Renderer>,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
    router: ViewRouter<AdminPanel>,
    poller: Poller,
    refresh_events: mpsc::UnboundedSender<OverviewRefresh>,
    confirm: Option<AdminConfirm>,
}

impl AdminController {
    pub fn new(
        game_api: Arc<dyn GameApi>,
        admin_api: Arc<dyn AdminApi>,
        store: Arc<dyn TokenStore>,
        renderer: Arc<dyn Renderer>,
        clock: Arc<dyn Clock>,
        refresh_interval: Duration,
        refresh_events: mpsc::UnboundedSender<OverviewRefresh>,
    ) -> Self {
        Self {
            gate: AuthGate::new(game_api, store, GateKind::Admin),
            actions: AdminActions::new(admin_api),
            renderer,
            clock,
            session: None,
            router: ViewRouter::new(AdminPanel::Overview),
            poller: Poller::new(refresh_interval),
            refresh_events,
            confirm: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_panel(&self) -> AdminPanel {
        self.router.current()
    }

    pub fn is_refreshing(&self) -> bool {
        self.poller.is_running()
    }

    pub async fn start(&mut self) {
        match self.gate.initialize().await {
            GateOutcome::Authenticated(session) => self.on_authenticated(session).await,
            GateOutcome::Unauthenticated => self.renderer.render_admin(&AdminScreen::Login),
            GateOutcome::Rejected(message) => {
                self.notify(NotificationLevel::Error, message);
                self.renderer.render_admin(&AdminScreen::Login);
            }
        }
    }

    /// Stops the refresh poller and drops the session. Loads already in
    /// flight lose their ticket.
    pub fn teardown(&mut self) {
        self.poller.stop();
        self.router.show(self.router.current());
        self.session = None;
        self.confirm = None;
    }

    pub async fn handle_command(&mut self, command: AdminCommand) -> Flow {
        if let Some(action) = self.confirm.take() {
            if command == AdminCommand::Confirm {
                self.run_confirmed(action).await;
                return Flow::Continue;
            }
            self.notify(NotificationLevel::Info, "Cancelled");
        }

        match command {
            AdminCommand::Quit => return Flow::Quit,
            AdminCommand::Help => self.notify(NotificationLevel::Info, ADMIN_HELP),
            AdminCommand::Confirm => self.notify(NotificationLevel::Info, "Nothing to confirm"),
            AdminCommand::Login { username, password } => {
                if let Some(session) = &self.session {
                    let message = format!("Already logged in as {}", session.user.username);
                    self.notify(NotificationLevel::Info, message);
                } else {
                    match self.gate.login(&username, &password).await {
                        Ok(session) => self.on_authenticated(session).await,
                        Err(e) => self.fail(e).await,
                    }
                }
            }
            command => {
                let Some(token) = self.token() else {
                    self.notify(NotificationLevel::Error, "Log in first");
                    return Flow::Continue;
                };
                self.handle_authenticated(command, token).await;
            }
        }
        Flow::Continue
    }

    async fn handle_authenticated(&mut self, command: AdminCommand, token: AuthToken) {
        match command {
            AdminCommand::Logout => {
                self.gate.logout(&token).await;
                self.teardown();
                self.notify(NotificationLevel::Info, "Logged out");
                self.renderer.render_admin(&AdminScreen::Login);
            }
            AdminCommand::Overview => self.show(AdminPanel::Overview).await,
            AdminCommand::Players => self.show(AdminPanel::Players).await,
            AdminCommand::Games => self.show(AdminPanel::Games).await,
            AdminCommand::Stats => self.show(AdminPanel::Stats).await,
            AdminCommand::System => self.show(AdminPanel::System).await,
            AdminCommand::Player(player_id) => {
                let ticket = self.enter(AdminPanel::Players);
                let loaded = self
                    .actions
                    .player_detail(&token, player_id)
                    .await
                    .map(AdminScreen::PlayerDetail);
                self.apply_load(ticket, loaded).await;
            }
            AdminCommand::Game(room_id) => {
                let ticket = self.enter(AdminPanel::Games);
                let loaded = self
                    .actions
                    .game_detail(&token, room_id)
                    .await
                    .map(AdminScreen::GameDetail);
                self.apply_load(ticket, loaded).await;
            }
            AdminCommand::Activate(player_id) => {
                match self.actions.set_player_active(&token, player_id, true).await {
                    Ok(()) => {
                        self.notify(
                            NotificationLevel::Success,
                            format!("Player #{} activated", player_id),
                        );
                        self.show(AdminPanel::Players).await;
                    }
                    Err(e) => self.fail(e).await,
                }
            }
            AdminCommand::Deactivate(player_id) => self.ask(
                AdminConfirm::Deactivate(player_id),
                format!("Deactivate player #{}?", player_id),
            ),
            AdminCommand::End(room_id) => self.ask(
                AdminConfirm::EndGame(room_id),
                format!("End game {} for all players?", room_id),
            ),
            AdminCommand::Cleanup(target) => {
                let what = match target {
                    CleanupTarget::Sessions => "Remove stale sessions",
                    CleanupTarget::Games => "Remove old finished games",
                };
                self.ask(AdminConfirm::Cleanup(target), format!("{}?", what));
            }
            AdminCommand::Export { kind, output } => self.export(token, kind, output).await,
            AdminCommand::Login { .. }
            | AdminCommand::Confirm
            | AdminCommand::Help
            | AdminCommand::Quit => {}
        }
    }

    /// Applies a timed overview refresh. Failures other than 401 are only
    /// logged.
    pub async fn handle_refresh(&mut self, refresh: OverviewRefresh) {
        if self.session.is_none() {
            tracing::debug!("Dropping overview refresh: not logged in");
            return;
        }
        match refresh.result {
            Ok(snapshot) => {
                let screen = AdminScreen::Overview {
                    overview: snapshot.overview,
                    activity: snapshot.activity,
                };
                self.apply_load(refresh.ticket, Ok(screen)).await;
            }
            Err(e) if e.is_unauthorized() => self.fail(e).await,
            Err(e) => tracing::debug!("Overview refresh failed: {}", e),
        }
    }

    async fn on_authenticated(&mut self, session: Session) {
        self.session = Some(session);
        self.show(AdminPanel::Overview).await;
    }

    fn enter(&mut self, panel: AdminPanel) -> LoadTicket<AdminPanel> {
        self.poller.stop();
        let ticket = self.router.show(panel);
        self.renderer.render_admin(&AdminScreen::Loading(panel));
        ticket
    }

    async fn show(&mut self, panel: AdminPanel) {
        let ticket = self.enter(panel);
        let Some(token) = self.token() else {
            return;
        };

        let loaded = match panel {
            AdminPanel::Overview => {
                self.actions
                    .overview(&token)
                    .await
                    .map(|snapshot| AdminScreen::Overview {
                        overview: snapshot.overview,
                        activity: snapshot.activity,
                    })
            }
            AdminPanel::Players => self.actions.players(&token).await.map(AdminScreen::Players),
            AdminPanel::Games => self.actions.games(&token).await.map(AdminScreen::Games),
            AdminPanel::Stats => self.actions.stats(&token).await.map(AdminScreen::Stats),
            AdminPanel::System => self
                .actions
                .system_info(&token)
                .await
                .map(AdminScreen::System),
        };
        self.apply_load(ticket, loaded).await;

        if panel == AdminPanel::Overview && self.session.is_some() && self.router.is_current(&ticket)
        {
            self.start_overview_refresh(token);
        }
    }

    fn start_overview_refresh(&mut self, token: AuthToken) {
        let actions = self.actions.clone();
        let events = self.refresh_events.clone();
        let ticket = self.router.refresh();
        self.poller.start(move || {
            let actions = actions.clone();
            let token = token.clone();
            let events = events.clone();
            async move {
                let result = actions.overview(&token).await;
                if events.send(OverviewRefresh { ticket, result }).is_err() {
                    tracing::debug!("Refresh receiver dropped");
                }
            }
        });
    }

    /// Renders a load only if its panel is still current.
    async fn apply_load(
        &mut self,
        ticket: LoadTicket<AdminPanel>,
        loaded: Result<AdminScreen, ActionError>,
    ) {
        if !self.router.is_current(&ticket) {
            tracing::debug!("Dropping {:?} load: panel no longer shown", ticket.panel());
            return;
        }
        match loaded {
            Ok(screen) => self.renderer.render_admin(&screen),
            Err(e) => self.fail(e).await,
        }
    }

    fn ask(&mut self, action: AdminConfirm, question: String) {
        self.confirm = Some(action);
        self.notify(
            NotificationLevel::Info,
            format!("{} Type `confirm` to proceed.", question),
        );
    }

    async fn run_confirmed(&mut self, action: AdminConfirm) {
        let Some(token) = self.token() else {
            return;
        };
        match action {
            AdminConfirm::Deactivate(player_id) => {
                match self.actions.set_player_active(&token, player_id, false).await {
                    Ok(()) => {
                        self.notify(
                            NotificationLevel::Success,
                            format!("Player #{} deactivated", player_id),
                        );
                        self.show(AdminPanel::Players).await;
                    }
                    Err(e) => self.fail(e).await,
                }
            }
            AdminConfirm::EndGame(room_id) => match self.actions.end_game(&token, room_id).await {
                Ok(()) => {
                    self.notify(NotificationLevel::Success, "Game ended");
                    self.show(AdminPanel::Games).await;
                }
                Err(e) => self.fail(e).await,
            },
            AdminConfirm::Cleanup(target) => match self.actions.cleanup(&token, target).await {
                Ok(message) => self.notify(NotificationLevel::Success, message),
                Err(e) => self.fail(e).await,
            },
        }
    }

    async fn export(&mut self, token: AuthToken, kind: ExportKind, output: Option<PathBuf>) {
        let json = match self.actions.export(&token, kind).await {
            Ok(json) => json,
            Err(e) => return self.fail(e).await,
        };

        match output {
            None => self.notify(NotificationLevel::Info, json),
            Some(path) => match tokio::fs::write(&path, json.as_bytes()).await {
                Ok(()) => self.notify(
                    NotificationLevel::Success,
                    format!("Exported {} to {}", kind.path_segment(), path.display()),
                ),
                Err(e) => {
                    tracing::warn!("Failed to write {}: {}", path.display(), e);
                    self.notify(
                        NotificationLevel::Error,
                        format!("Could not write {}: {}", path.display(), e),
                    );
                }
            },
        }
    }

    async fn fail(&mut self, error: ActionError) {
        if error.is_unauthorized() && self.session.is_some() {
            tracing::info!("Session rejected by the server");
            self.teardown();
            self.gate.invalidate().await;
            self.notify(NotificationLevel::Error, error.user_message());
            self.renderer.render_admin(&AdminScreen::Login);
        } else {
            tracing::debug!("Admin action failed: {}", error);
            self.notify(NotificationLevel::Error, error.user_message());
        }
    }

    fn token(&self) -> Option<AuthToken> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.renderer.notify(&Notification {
            level,
            message: message.into(),
            at_millis: self.clock.now_millis(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ApiError, MockAdminApi, MockGameApi, User, UserId,
            admin::{ActivityEntry, AdminOverview, AdminPlayer},
        },
        infrastructure::InMemoryTokenStore,
        ui::render::RecordingRenderer,
        usecase::auth_gate::ADMIN_ACCESS_REQUIRED,
    };
    use mockall::predicate::*;
    use numberhunt_shared::time::FixedClock;

    struct Harness {
        controller: AdminController,
        renderer: RecordingRenderer,
        store: InMemoryTokenStore,
        _events: mpsc::UnboundedReceiver<OverviewRefresh>,
    }

    fn harness(game_api: MockGameApi, admin_api: MockAdminApi) -> Harness {
        let renderer = RecordingRenderer::new();
        let store = InMemoryTokenStore::new(Some(AuthToken::new("t".to_string()).unwrap()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = AdminController::new(
            Arc::new(game_api),
            Arc::new(admin_api),
            Arc::new(store.clone()),
            Arc::new(renderer.clone()),
            Arc::new(FixedClock::new(0)),
            Duration::from_secs(3600),
            events_tx,
        );
        Harness {
            controller,
            renderer,
            store,
            _events: events_rx,
        }
    }

    fn staff(is_staff: bool) -> MockGameApi {
        let mut api = MockGameApi::new();
        api.expect_profile().returning(move |_| {
            Ok(User {
                id: UserId(1),
                username: "root".to_string(),
                email: String::new(),
                is_staff,
                is_superuser: false,
            })
        });
        api
    }

    fn overview() -> AdminOverview {
        AdminOverview {
            total_users: 4,
            total_games: 2,
            active_games: 1,
            total_rounds: 6,
        }
    }

    fn expect_overview(api: &mut MockAdminApi) {
        api.expect_overview().returning(|_| Ok(overview()));
        api.expect_recent_activity().returning(|_| {
            Ok(vec![ActivityEntry {
                timestamp: "2026-10-15T10:00:00Z".to_string(),
                description: "Game Started in room 'Friday'".to_string(),
            }])
        });
    }

    fn player(id: i64, is_active: bool) -> AdminPlayer {
        AdminPlayer {
            id,
            username: format!("user{}", id),
            email: String::new(),
            games_played: 0,
            win_rate: 0.0,
            last_active: None,
            is_online: false,
            is_active,
        }
    }

    #[tokio::test]
    async fn test_regular_user_is_rejected() {
        // テスト項目: staff でないユーザーは拒否され、トークンが削除される
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        admin_api.expect_overview().never();
        let mut h = harness(staff(false), admin_api);

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert!(h.controller.session().is_none());
        assert_eq!(h.renderer.last_admin_screen(), Some(AdminScreen::Login));
        assert_eq!(
            h.renderer.last_notification().unwrap().message,
            ADMIN_ACCESS_REQUIRED
        );
        assert!(h.store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_staff_sees_overview_with_refresh() {
        // テスト項目: staff ユーザーは概要パネルが表示され、定期更新が動く
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        let mut h = harness(staff(true), admin_api);

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert_eq!(h.controller.current_panel(), AdminPanel::Overview);
        assert!(h.controller.is_refreshing());
        assert!(matches!(
            h.renderer.last_admin_screen(),
            Some(AdminScreen::Overview { .. })
        ));
    }

    #[tokio::test]
    async fn test_leaving_overview_stops_refresh() {
        // テスト項目: 概要以外のパネルに移ると定期更新が止まる
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        admin_api
            .expect_players()
            .returning(|_| Ok(vec![player(2, true)]));
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;

        // when (操作):
        h.controller.handle_command(AdminCommand::Players).await;

        // then (期待する結果):
        assert_eq!(h.controller.current_panel(), AdminPanel::Players);
        assert!(!h.controller.is_refreshing());
        assert_eq!(
            h.renderer.last_admin_screen(),
            Some(AdminScreen::Players(vec![player(2, true)]))
        );
    }

    #[tokio::test]
    async fn test_refresh_for_left_panel_is_dropped() {
        // テスト項目: パネル移動後に届いた概要の更新は描画されない
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        admin_api.expect_stats().returning(|_| Ok(Default::default()));
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;
        let ticket = h.controller.router.refresh();
        h.controller.handle_command(AdminCommand::Stats).await;
        let rendered = h.renderer.admin_screens().len();

        // when (操作):
        h.controller
            .handle_refresh(OverviewRefresh {
                ticket,
                result: Ok(OverviewSnapshot {
                    overview: overview(),
                    activity: Vec::new(),
                }),
            })
            .await;

        // then (期待する結果):
        assert_eq!(h.renderer.admin_screens().len(), rendered);
    }

    #[tokio::test]
    async fn test_refresh_queued_before_logout_is_dropped() {
        // テスト項目: ログアウト前にキューに積まれた概要の更新はログイン画面を上書きしない
        // given (前提条件):
        let mut game_api = staff(true);
        game_api.expect_logout().returning(|_| Ok(()));
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        let mut h = harness(game_api, admin_api);
        h.controller.start().await;
        let ticket = h.controller.router.refresh();
        h.controller.handle_command(AdminCommand::Logout).await;

        // when (操作):
        h.controller
            .handle_refresh(OverviewRefresh {
                ticket,
                result: Ok(OverviewSnapshot {
                    overview: overview(),
                    activity: Vec::new(),
                }),
            })
            .await;

        // then (期待する結果):
        assert!(h.controller.session().is_none());
        assert_eq!(h.renderer.last_admin_screen(), Some(AdminScreen::Login));
    }

    #[tokio::test]
    async fn test_refresh_unauthorized_logs_out() {
        // テスト項目: 定期更新での 401 でログイン画面に戻る
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;
        let ticket = h.controller.router.refresh();

        // when (操作):
        h.controller
            .handle_refresh(OverviewRefresh {
                ticket,
                result: Err(ActionError::Api(ApiError::Unauthorized)),
            })
            .await;

        // then (期待する結果):
        assert!(h.controller.session().is_none());
        assert!(!h.controller.is_refreshing());
        assert_eq!(h.renderer.last_admin_screen(), Some(AdminScreen::Login));
        assert!(h.store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_network_failure_keeps_state() {
        // テスト項目: 定期更新の 401 以外の失敗では状態が変わらない
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;
        let ticket = h.controller.router.refresh();
        let notifications = h.renderer.notifications().len();

        // when (操作):
        h.controller
            .handle_refresh(OverviewRefresh {
                ticket,
                result: Err(ActionError::Api(ApiError::Network("down".to_string()))),
            })
            .await;

        // then (期待する結果):
        assert!(h.controller.session().is_some());
        assert_eq!(h.renderer.notifications().len(), notifications);
    }

    #[tokio::test]
    async fn test_deactivate_requires_confirmation() {
        // テスト項目: 無効化は confirm 後にのみ実行される
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        admin_api
            .expect_set_player_active()
            .with(always(), eq(5), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(()));
        admin_api
            .expect_players()
            .returning(|_| Ok(vec![player(5, false)]));
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;

        // when (操作):
        h.controller.handle_command(AdminCommand::Deactivate(5)).await;
        h.controller.handle_command(AdminCommand::Confirm).await;

        // then (期待する結果):
        assert_eq!(h.controller.current_panel(), AdminPanel::Players);
        assert!(
            h.renderer
                .notifications()
                .iter()
                .any(|n| n.message == "Player #5 deactivated")
        );
    }

    #[tokio::test]
    async fn test_cleanup_cancelled_by_other_command() {
        // テスト項目: confirm 以外のコマンドでクリーンアップは取り消される
        // given (前提条件):
        let mut admin_api = MockAdminApi::new();
        expect_overview(&mut admin_api);
        admin_api.expect_cleanup().never();
        admin_api.expect_stats().returning(|_| Ok(Default::default()));
        let mut h = harness(staff(true), admin_api);
        h.controller.start().await;

        // when (操作):
        h.controller
            .handle_command(AdminCommand::Cleanup(CleanupTarget::Sessions))
            .await;
        h.controller.handle_command(AdminCommand::Stats).await;
        h.controller.handle_command(AdminCommand::Confirm).await;

        // then (期待する結果):
        let messages: Vec<String> = h
            .renderer
            .notifications()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.contains(&"Cancelled".to_string()));
        assert_eq!(messages.last().unwrap(), "Nothing to confirm");
    }
}
