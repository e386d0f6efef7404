//! Player client controller.
//!
//! Owns the session, the phase, the active room and the game poller. It is
//! only mutated from the runner's event loop: user commands arrive through
//! `handle_command`, poll results through `handle_poll_event`.

use std::{sync::Arc, time::Duration};

use numberhunt_shared::time::Clock;
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{
        ApiError, AuthToken, ContinueOutcome, Control, GameApi, LeaderboardPeriod, Notification,
        NotificationLevel, PendingActions, Phase, PhaseEvent, PlayerId, ReconcileInput, Reconciled,
        Reconnection, Room, RoomId, RoomStatus, Round, RoundResults, Screen, Session, SubPanel,
        TokenStore, reconcile,
        view::{DashboardContent, DashboardPanel, DashboardView, LobbyView, RoomLine, RoundView},
    },
    usecase::{
        ActionError, AuthGate, GameActions, GateKind, GateOutcome, PollEvent, PollTarget, Poller,
        RoomListing, game_actions::DEFAULT_LEADERBOARD_LIMIT, poller::start_game_polling,
    },
};

use super::{
    command::{PLAYER_HELP, PlayerCommand, RoomRef, VoteTarget},
    render::Renderer,
    router::ViewRouter,
};

/// Whether the event loop keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Destructive actions held until the user types `confirm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirmable {
    CloseRoom(RoomId),
}

#[derive(Debug, Clone)]
struct ActiveRoom {
    room: Room,
    /// Only kept while `Playing`
    round: Option<Round>,
}

pub struct GameController {
    gate: AuthGate,
    actions: GameActions,
    api: Arc<dyn GameApi>,
    renderer: Arc<dyn Renderer>,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
    phase: Phase,
    router: ViewRouter<DashboardPanel>,
    dashboard: DashboardContent,
    listing: RoomListing,
    leaderboard_period: LeaderboardPeriod,
    leaderboard_limit: u32,
    reconnection: Option<Reconnection>,
    active: Option<ActiveRoom>,
    round_results: Option<RoundResults>,
    /// Room whose final results were already requested
    final_results_loaded: Option<RoomId>,
    /// Round number whose results were already requested
    round_results_loaded: Option<u32>,
    pending: PendingActions,
    confirm: Option<Confirmable>,
    poller: Poller,
    poll_target: watch::Sender<Option<PollTarget>>,
    poll_events: mpsc::UnboundedSender<PollEvent>,
}

impl GameController {
    pub fn new(
        api: Arc<dyn GameApi>,
        store: Arc<dyn TokenStore>,
        renderer: Arc<dyn Renderer>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
        poll_events: mpsc::UnboundedSender<PollEvent>,
    ) -> Self {
        let (poll_target, _) = watch::channel(None);
        Self {
            gate: AuthGate::new(Arc::clone(&api), store, GateKind::Player),
            actions: GameActions::new(Arc::clone(&api)),
            api,
            renderer,
            clock,
            session: None,
            phase: Phase::Auth,
            router: ViewRouter::new(DashboardPanel::Rooms),
            dashboard: DashboardContent::Loading,
            listing: RoomListing::default(),
            leaderboard_period: LeaderboardPeriod::default(),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            reconnection: None,
            active: None,
            round_results: None,
            final_results_loaded: None,
            round_results_loaded: None,
            pending: PendingActions::default(),
            confirm: None,
            poller: Poller::new(poll_interval),
            poll_target,
            poll_events,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn active_room(&self) -> Option<&Room> {
        self.active.as_ref().map(|a| &a.room)
    }

    pub fn pending(&self) -> PendingActions {
        self.pending
    }

    pub fn poll_target(&self) -> Option<PollTarget> {
        *self.poll_target.borrow()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Validates the cached token and shows either the login screen or the
    /// dashboard.
    pub async fn start(&mut self) {
        match self.gate.initialize().await {
            GateOutcome::Authenticated(session) => self.on_authenticated(session).await,
            GateOutcome::Unauthenticated => self.render(),
            GateOutcome::Rejected(message) => {
                self.notify(NotificationLevel::Error, message);
                self.render();
            }
        }
    }

    /// Stops the poller and drops all session state. The stored token is
    /// left alone.
    pub fn teardown(&mut self) {
        self.stop_polling();
        self.session = None;
        self.active = None;
        self.reset_room_state();
        self.listing = RoomListing::default();
        self.dashboard = DashboardContent::Loading;
        self.reconnection = None;
        self.confirm = None;
    }

    pub async fn handle_command(&mut self, command: PlayerCommand) -> Flow {
        if let Some(action) = self.confirm.take() {
            if command == PlayerCommand::Confirm {
                self.run_confirmed(action).await;
                return Flow::Continue;
            }
            self.notify(NotificationLevel::Info, "Cancelled");
        }

        match command {
            PlayerCommand::Quit => return Flow::Quit,
            PlayerCommand::Help => self.notify(NotificationLevel::Info, PLAYER_HELP),
            PlayerCommand::Confirm => self.notify(NotificationLevel::Info, "Nothing to confirm"),
            PlayerCommand::Login { username, password } => {
                if self.ensure_logged_out() {
                    match self.gate.login(&username, &password).await {
                        Ok(session) => self.on_authenticated(session).await,
                        Err(e) => self.fail(e).await,
                    }
                }
            }
            PlayerCommand::Register(registration) => {
                if self.ensure_logged_out() {
                    match self.gate.register(&registration).await {
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

    async fn handle_authenticated(&mut self, command: PlayerCommand, token: AuthToken) {
        match command {
            PlayerCommand::Logout => self.logout(token).await,
            PlayerCommand::Rooms => {
                if self.require_phase(&[Phase::Dashboard]) {
                    self.show_dashboard(DashboardPanel::Rooms).await;
                }
            }
            PlayerCommand::History => {
                if self.require_phase(&[Phase::Dashboard]) {
                    self.show_dashboard(DashboardPanel::History).await;
                }
            }
            PlayerCommand::Leaderboard { period, limit } => {
                if self.require_phase(&[Phase::Dashboard]) {
                    self.leaderboard_period = period;
                    self.leaderboard_limit = limit;
                    self.show_dashboard(DashboardPanel::Leaderboard).await;
                }
            }
            PlayerCommand::Create(form) => {
                if self.require_phase(&[Phase::Dashboard]) {
                    match self.actions.create_room(&token, form).await {
                        Ok(room) => {
                            let message = match &room.room_code {
                                Some(code) if room.is_private => {
                                    format!("Created '{}' (code {})", room.name, code)
                                }
                                _ => format!("Created '{}'", room.name),
                            };
                            self.notify(NotificationLevel::Success, message);
                            self.enter_room(room).await;
                        }
                        Err(e) => self.fail(e).await,
                    }
                }
            }
            PlayerCommand::Join { room, nickname } => {
                if self.require_phase(&[Phase::Dashboard]) {
                    self.join(token, room, &nickname).await;
                }
            }
            PlayerCommand::JoinByCode { code, nickname } => {
                if self.require_phase(&[Phase::Dashboard]) {
                    match self.actions.join_by_code(&token, &code, &nickname).await {
                        Ok(room) => {
                            self.notify(NotificationLevel::Success, format!("Joined '{}'", room.name));
                            self.enter_room(room).await;
                        }
                        Err(e) => self.fail(e).await,
                    }
                }
            }
            PlayerCommand::Resume => {
                if self.require_phase(&[Phase::Dashboard]) {
                    self.resume(token).await;
                }
            }
            PlayerCommand::Leave => {
                if self.require_phase(&[Phase::Lobby, Phase::Playing, Phase::Results]) {
                    self.leave(token).await;
                }
            }
            PlayerCommand::Acknowledge => {
                if self.require_phase(&[Phase::Results]) {
                    self.exit_room(PhaseEvent::ResultsAcknowledged).await;
                }
            }
            PlayerCommand::Start => self.start_game(token).await,
            PlayerCommand::Close => self.request_close(),
            PlayerCommand::Answer(input) => self.submit_answer(token, &input).await,
            PlayerCommand::StartVoting => self.start_voting(token).await,
            PlayerCommand::Vote(target) => self.submit_vote(token, target).await,
            PlayerCommand::Continue => self.continue_round(token).await,
            PlayerCommand::Login { .. }
            | PlayerCommand::Register(_)
            | PlayerCommand::Confirm
            | PlayerCommand::Help
            | PlayerCommand::Quit => {}
        }
    }

    /// Applies one poll result. Results for a room other than the active
    /// one (or arriving with no active room) are dropped.
    pub async fn handle_poll_event(&mut self, event: PollEvent) {
        let Some(active_id) = self.active.as_ref().map(|a| a.room.id) else {
            tracing::debug!("Dropping poll result for {}: no active room", event.room_id());
            return;
        };
        if event.room_id() != active_id {
            tracing::debug!("Dropping stale poll result for {}", event.room_id());
            return;
        }

        match event {
            PollEvent::Snapshot { room, round, .. } => self.apply_snapshot(room, round).await,
            PollEvent::Failed { error, .. } => match error {
                ApiError::Unauthorized => self.handle_unauthorized().await,
                ApiError::Rejected { status: 404, .. } => {
                    self.notify(NotificationLevel::Error, "This room no longer exists");
                    self.exit_room(PhaseEvent::LeftRoom).await;
                }
                error => tracing::debug!("Poll failed: {}", error),
            },
        }
    }

    async fn apply_snapshot(&mut self, room: Room, round: Option<Round>) {
        let previous = self.phase;
        if previous == Phase::Results && room.status != RoomStatus::Finished {
            tracing::debug!("Ignoring {} room while showing results", room.status.label());
            return;
        }

        let next = previous.transition(PhaseEvent::RoomPolled(room.status));
        self.phase = next;
        if let Some(active) = self.active.as_mut() {
            active.room = room;
            active.round = if next.polls_round() { round } else { None };
        }
        if next != previous {
            tracing::info!("Phase {:?} -> {:?}", previous, next);
            self.update_poll_target();
        }
        self.pending.clear();

        match next {
            Phase::Results => self.load_final_results().await,
            Phase::Playing => self.load_round_results().await,
            _ => {}
        }
        self.render();
    }

    async fn on_authenticated(&mut self, session: Session) {
        self.phase = self.phase.transition(PhaseEvent::Authenticated);
        let token = session.token.clone();
        self.session = Some(session);

        self.reconnection = match self.gate.check_reconnection(&token).await {
            Ok(reconnection) => reconnection,
            Err(e) => return self.fail(e).await,
        };
        if let Some(reconnection) = &self.reconnection {
            let message = format!(
                "You are still in '{}' ({}). Type `resume` to go back in.",
                reconnection.room_name, reconnection.room_status
            );
            self.notify(NotificationLevel::Info, message);
        }
        self.show_dashboard(DashboardPanel::Rooms).await;
    }

    async fn logout(&mut self, token: AuthToken) {
        self.gate.logout(&token).await;
        self.teardown();
        self.phase = self.phase.transition(PhaseEvent::AuthLost);
        self.notify(NotificationLevel::Info, "Logged out");
        self.render();
    }

    /// Global 401 handler.
    async fn handle_unauthorized(&mut self) {
        tracing::info!("Session rejected by the server");
        self.teardown();
        self.gate.invalidate().await;
        self.phase = self.phase.transition(PhaseEvent::AuthLost);
        self.notify(
            NotificationLevel::Error,
            ApiError::Unauthorized.user_message(),
        );
        self.render();
    }

    async fn fail(&mut self, error: ActionError) {
        if error.is_unauthorized() && self.session.is_some() {
            self.handle_unauthorized().await;
        } else {
            tracing::debug!("Action failed: {}", error);
            self.notify(NotificationLevel::Error, error.user_message());
        }
    }

    async fn show_dashboard(&mut self, panel: DashboardPanel) {
        let ticket = self.router.show(panel);
        self.dashboard = DashboardContent::Loading;
        self.render();

        let Some(token) = self.token() else {
            return;
        };
        let loaded = match panel {
            DashboardPanel::Rooms => match self.actions.room_listing(&token).await {
                Ok(listing) => {
                    self.listing = listing;
                    Ok(self.rooms_content())
                }
                Err(e) => Err(e),
            },
            DashboardPanel::History => self
                .actions
                .history(&token)
                .await
                .map(DashboardContent::History),
            DashboardPanel::Leaderboard => {
                let period = self.leaderboard_period;
                self.actions
                    .leaderboard(&token, period, self.leaderboard_limit)
                    .await
                    .map(|entries| DashboardContent::Leaderboard { period, entries })
            }
        };

        if !self.router.is_current(&ticket) || self.phase != Phase::Dashboard {
            tracing::debug!("Dropping {:?} load: panel no longer shown", ticket.panel());
            return;
        }
        match loaded {
            Ok(content) => {
                self.dashboard = content;
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    fn rooms_content(&self) -> DashboardContent {
        let line = |room: &Room| RoomLine {
            room_id: room.id,
            name: room.name.clone(),
            status: room.status,
            player_count: room.player_count(),
            max_players: room.max_players,
            is_private: room.is_private,
            is_member: room.current_user_player.is_some()
                || self
                    .session
                    .as_ref()
                    .is_some_and(|s| room.player_for(s.user.id).is_some()),
        };
        DashboardContent::Rooms {
            current: self.listing.mine.current_room.as_ref().map(line),
            available: self.listing.available.iter().map(line).collect(),
        }
    }

    async fn join(&mut self, token: AuthToken, room: RoomRef, nickname: &str) {
        let room_id = match room {
            RoomRef::Id(id) => id,
            RoomRef::Index(index) => {
                match index
                    .checked_sub(1)
                    .and_then(|i| self.listing.available.get(i))
                {
                    Some(room) => room.id,
                    None => {
                        self.notify(
                            NotificationLevel::Error,
                            format!("No room number {} in the list", index),
                        );
                        return;
                    }
                }
            }
        };

        match self.actions.join_room(&token, room_id, nickname).await {
            Ok(room) => {
                self.notify(NotificationLevel::Success, format!("Joined '{}'", room.name));
                self.enter_room(room).await;
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn resume(&mut self, token: AuthToken) {
        let room_id = self
            .reconnection
            .as_ref()
            .map(|r| r.room_id)
            .or_else(|| self.listing.mine.current_room.as_ref().map(|r| r.id));
        let Some(room_id) = room_id else {
            self.notify(NotificationLevel::Info, "No room to resume");
            return;
        };

        match self.actions.get_room(&token, room_id).await {
            Ok(room) => self.enter_room(room).await,
            Err(e) => self.fail(e).await,
        }
    }

    async fn enter_room(&mut self, room: Room) {
        let next = self.phase.transition(PhaseEvent::RoomEntered(room.status));
        if !next.is_room_phase() {
            return;
        }
        self.phase = next;
        self.reset_room_state();
        self.reconnection = None;
        let room_id = room.id;
        self.active = Some(ActiveRoom { room, round: None });
        self.start_polling(room_id);

        if self.phase == Phase::Results {
            self.load_final_results().await;
        }
        self.render();
    }

    async fn leave(&mut self, token: AuthToken) {
        let Some(room_id) = self.active.as_ref().map(|a| a.room.id) else {
            return;
        };
        match self.actions.leave_room(&token, room_id).await {
            Ok(()) => {
                self.notify(NotificationLevel::Info, "Left the room");
                self.exit_room(PhaseEvent::LeftRoom).await;
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn exit_room(&mut self, event: PhaseEvent) {
        self.stop_polling();
        self.active = None;
        self.reset_room_state();
        self.phase = self.phase.transition(event);
        self.show_dashboard(DashboardPanel::Rooms).await;
    }

    fn reset_room_state(&mut self) {
        self.round_results = None;
        self.final_results_loaded = None;
        self.round_results_loaded = None;
        self.pending.clear();
    }

    fn start_polling(&mut self, room_id: RoomId) {
        let Some(token) = self.token() else {
            return;
        };
        self.poll_target.send_replace(Some(PollTarget {
            room_id,
            include_round: self.phase.polls_round(),
        }));
        start_game_polling(
            &mut self.poller,
            Arc::clone(&self.api),
            token,
            self.poll_target.subscribe(),
            self.poll_events.clone(),
        );
    }

    fn update_poll_target(&mut self) {
        let target = self.active.as_ref().map(|a| PollTarget {
            room_id: a.room.id,
            include_round: self.phase.polls_round(),
        });
        self.poll_target.send_replace(target);
    }

    fn stop_polling(&mut self) {
        self.poller.stop();
        self.poll_target.send_replace(None);
    }

    /// Fetched once per room. A room closed before any round finished has
    /// no results; the room scores are shown instead.
    async fn load_final_results(&mut self) {
        let (Some(token), Some(room_id)) = (self.token(), self.active.as_ref().map(|a| a.room.id))
        else {
            return;
        };
        if self.final_results_loaded == Some(room_id) {
            return;
        }
        self.final_results_loaded = Some(room_id);

        match self.actions.round_results(&token, room_id).await {
            Ok(results) => self.round_results = Some(results),
            Err(ActionError::Api(ApiError::Rejected {
                status: 400 | 404,
                message,
            })) => tracing::debug!("No round results for this room: {}", message),
            Err(e) => self.fail(e).await,
        }
    }

    /// Fetched once per round number, when the round reaches its results.
    async fn load_round_results(&mut self) {
        let Some(token) = self.token() else {
            return;
        };
        let Some((room_id, number)) = self.active.as_ref().and_then(|a| {
            a.round
                .as_ref()
                .filter(|r| SubPanel::from_round_status(&r.status) == Some(SubPanel::Results))
                .map(|r| (a.room.id, r.number))
        }) else {
            return;
        };
        if self.round_results_loaded == Some(number) {
            return;
        }
        self.round_results_loaded = Some(number);

        match self.actions.round_results(&token, room_id).await {
            Ok(results) => self.round_results = Some(results),
            Err(e) => self.fail(e).await,
        }
    }

    async fn start_game(&mut self, token: AuthToken) {
        let Some(view) = self.lobby_view() else {
            self.not_available();
            return;
        };
        if !self.check_control(&view.start_game, "Only the host can start the game") {
            return;
        }
        let Some(room) = self.active_room().cloned() else {
            return;
        };

        match self.actions.start_game(&token, &room).await {
            Ok(()) => {
                self.pending.start_game = true;
                self.notify(NotificationLevel::Success, "Starting the game...");
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    fn request_close(&mut self) {
        let control = match self.reconciled().map(|r| r.screen) {
            Some(Screen::Lobby(view)) => view.close_room,
            Some(Screen::Playing(view)) => view.close_room,
            _ => {
                self.not_available();
                return;
            }
        };
        if !self.check_control(&control, "Only the host can close the room") {
            return;
        }
        let Some((room_id, name)) = self.active_room().map(|r| (r.id, r.name.clone())) else {
            return;
        };
        self.confirm = Some(Confirmable::CloseRoom(room_id));
        self.notify(
            NotificationLevel::Info,
            format!("Close '{}' for everyone? Type `confirm` to proceed.", name),
        );
    }

    async fn run_confirmed(&mut self, action: Confirmable) {
        match action {
            Confirmable::CloseRoom(room_id) => {
                let (Some(token), Some(active_id)) =
                    (self.token(), self.active.as_ref().map(|a| a.room.id))
                else {
                    return;
                };
                if active_id != room_id {
                    self.not_available();
                    return;
                }
                match self.actions.close_room(&token, room_id).await {
                    Ok(()) => {
                        self.pending.close_room = true;
                        self.notify(NotificationLevel::Success, "Room closed");
                        self.render();
                    }
                    Err(e) => self.fail(e).await,
                }
            }
        }
    }

    async fn submit_answer(&mut self, token: AuthToken, input: &str) {
        let Some(view) = self.round_view_for(SubPanel::Answering) else {
            self.not_available();
            return;
        };
        if !self.check_control(&view.answer, "You cannot answer right now") {
            return;
        }

        match self.actions.submit_answer(&token, view.room_id, input).await {
            Ok(answer) => {
                self.pending.answer = true;
                self.notify(
                    NotificationLevel::Success,
                    format!("Answer {} submitted", answer),
                );
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn start_voting(&mut self, token: AuthToken) {
        let Some(view) = self.round_view_for(SubPanel::Discussion) else {
            self.not_available();
            return;
        };
        if !self.check_control(&view.start_voting, "Voting cannot start right now") {
            return;
        }

        match self.actions.start_voting(&token, view.room_id).await {
            Ok(()) => {
                self.pending.start_voting = true;
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn submit_vote(&mut self, token: AuthToken, target: VoteTarget) {
        let Some(view) = self.round_view_for(SubPanel::Voting) else {
            self.not_available();
            return;
        };
        if !self.check_control(&view.vote, "You cannot vote right now") {
            return;
        }
        let (Some(room), Some(user)) = (
            self.active_room().cloned(),
            self.session.as_ref().map(|s| s.user.clone()),
        ) else {
            return;
        };

        let selection: Vec<PlayerId> = match &target {
            VoteTarget::Index(index) => index
                .checked_sub(1)
                .and_then(|i| view.candidates.get(i))
                .map(|c| c.player_id)
                .into_iter()
                .collect(),
            VoteTarget::Nickname(nickname) => room
                .players
                .iter()
                .filter(|p| p.nickname.eq_ignore_ascii_case(nickname))
                .map(|p| p.id)
                .take(1)
                .collect(),
        };

        match self
            .actions
            .submit_vote(&token, &room, &user, &selection)
            .await
        {
            Ok(_) => {
                self.pending.vote = true;
                self.notify(NotificationLevel::Success, "Vote submitted");
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    async fn continue_round(&mut self, token: AuthToken) {
        let Some(view) = self.round_view_for(SubPanel::Results) else {
            self.not_available();
            return;
        };
        if !self.check_control(&view.continue_round, "You cannot continue right now") {
            return;
        }

        match self.actions.continue_round(&token, view.room_id).await {
            Ok(outcome) => {
                self.pending.continue_round = true;
                let message = match outcome {
                    ContinueOutcome::NextRound(number) => format!("Round {} is starting", number),
                    ContinueOutcome::GameEnded => "The game is over".to_string(),
                };
                self.notify(NotificationLevel::Success, message);
                self.render();
            }
            Err(e) => self.fail(e).await,
        }
    }

    /// Whether a control may be dispatched. Explains why not otherwise.
    fn check_control(&self, control: &Control, hidden_reason: &str) -> bool {
        match control {
            Control::Enabled(_) => true,
            Control::Hidden => {
                self.notify(NotificationLevel::Error, hidden_reason);
                false
            }
            Control::Disabled(label) | Control::Pending(label) => {
                self.notify(NotificationLevel::Info, label.as_str());
                false
            }
        }
    }

    fn require_phase(&self, allowed: &[Phase]) -> bool {
        if allowed.contains(&self.phase) {
            return true;
        }
        let message = match self.phase {
            Phase::Lobby | Phase::Playing => "Leave the room first",
            Phase::Results => "Type `ok` to return to the dashboard first",
            Phase::Auth | Phase::Dashboard => "Not available right now",
        };
        self.notify(NotificationLevel::Error, message);
        false
    }

    fn not_available(&self) {
        self.notify(NotificationLevel::Error, "Not available right now");
    }

    fn ensure_logged_out(&self) -> bool {
        match &self.session {
            Some(session) => {
                self.notify(
                    NotificationLevel::Info,
                    format!("Already logged in as {}", session.user.username),
                );
                false
            }
            None => true,
        }
    }

    fn token(&self) -> Option<AuthToken> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    fn reconciled(&self) -> Option<Reconciled> {
        let session = self.session.as_ref()?;
        let active = self.active.as_ref()?;
        Some(reconcile(&ReconcileInput {
            session,
            room: &active.room,
            round: active.round.as_ref(),
            round_results: self.round_results.as_ref(),
            pending: &self.pending,
        }))
    }

    fn lobby_view(&self) -> Option<LobbyView> {
        if self.phase != Phase::Lobby {
            return None;
        }
        match self.reconciled()?.screen {
            Screen::Lobby(view) => Some(view),
            _ => None,
        }
    }

    fn round_view_for(&self, panel: SubPanel) -> Option<RoundView> {
        if self.phase != Phase::Playing {
            return None;
        }
        match self.reconciled()?.screen {
            Screen::Playing(view) if view.panel == Some(panel) => Some(view),
            _ => None,
        }
    }

    fn render(&self) {
        let screen = match (self.phase, &self.session) {
            (Phase::Auth, _) | (_, None) => Screen::Login,
            (Phase::Dashboard, Some(session)) => Screen::Dashboard(DashboardView {
                username: session.user.username.clone(),
                panel: self.router.current(),
                content: self.dashboard.clone(),
            }),
            (Phase::Lobby | Phase::Playing | Phase::Results, Some(_)) => match self.reconciled() {
                Some(reconciled) => reconciled.screen,
                None => return,
            },
        };
        self.renderer.render(&screen);
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
            MockGameApi, Player, RoundStatus, User, UserId, UserRooms,
            entity::{RoundAnswer, RevealedAnswer},
        },
        infrastructure::InMemoryTokenStore,
        ui::render::RecordingRenderer,
    };
    use mockall::predicate::*;
    use numberhunt_shared::time::FixedClock;
    use uuid::Uuid;

    const NOW: i64 = 1672498800000;

    struct Harness {
        controller: GameController,
        renderer: RecordingRenderer,
        store: InMemoryTokenStore,
        _events: mpsc::UnboundedReceiver<PollEvent>,
    }

    fn harness(api: MockGameApi, token: Option<&str>) -> Harness {
        let renderer = RecordingRenderer::new();
        let store = InMemoryTokenStore::new(token.map(|t| AuthToken::new(t.to_string()).unwrap()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = GameController::new(
            Arc::new(api),
            Arc::new(store.clone()),
            Arc::new(renderer.clone()),
            Arc::new(FixedClock::new(NOW)),
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

    fn user(id: i64) -> User {
        User {
            id: UserId(id),
            username: format!("user{}", id),
            email: String::new(),
            is_staff: false,
            is_superuser: false,
        }
    }

    fn room_id() -> RoomId {
        RoomId::new(Uuid::nil())
    }

    fn other_room_id() -> RoomId {
        RoomId::new(Uuid::from_u128(7))
    }

    fn room(status: RoomStatus, host: i64, player_count: i64) -> Room {
        Room {
            id: room_id(),
            name: "Friday".to_string(),
            status,
            host_id: Some(UserId(host)),
            players: (1..=player_count)
                .map(|i| Player {
                    id: PlayerId(100 + i),
                    user_id: Some(UserId(i)),
                    nickname: format!("p{}", i),
                    score: i * 10,
                    is_connected: true,
                    is_host: i == host,
                })
                .collect(),
            max_players: 8,
            total_rounds: 3,
            current_round: 1,
            is_private: false,
            room_code: None,
            current_user_player: None,
        }
    }

    fn round(number: u32, status: RoundStatus) -> Round {
        Round {
            number,
            status,
            question_text: Some("How many pets?".to_string()),
            answers: vec![RoundAnswer {
                player_id: PlayerId(101),
                nickname: "p1".to_string(),
                value: 3,
            }],
            votes: Vec::new(),
            user_has_answered: false,
            user_has_voted: false,
        }
    }

    fn results(round_number: u32) -> RoundResults {
        RoundResults {
            round_number,
            question_text: "How many pets?".to_string(),
            decoy_question_text: "How many shoes?".to_string(),
            answers: vec![RevealedAnswer {
                player_id: PlayerId(101),
                nickname: "p1".to_string(),
                value: 3,
                is_imposter: true,
            }],
            imposter_nickname: "p1".to_string(),
            imposter_caught: false,
            most_voted_nickname: None,
            total_votes: 0,
            scores: vec![("p1".to_string(), 10)],
        }
    }

    /// Profile, reconnection check and the dashboard room listing.
    fn expect_session(api: &mut MockGameApi, user_id: i64) {
        api.expect_profile().returning(move |_| Ok(user(user_id)));
        api.expect_check_reconnection().returning(|_| Ok(None));
        api.expect_user_rooms()
            .returning(|_| Ok(UserRooms::default()));
        api.expect_list_rooms().returning(|_| Ok(Vec::new()));
    }

    fn expect_created(api: &mut MockGameApi, created: Room) {
        api.expect_create_room()
            .times(1)
            .returning(move |_, _| Ok(created.clone()));
    }

    fn create_command() -> PlayerCommand {
        PlayerCommand::Create(crate::domain::NewRoom {
            name: "Friday".to_string(),
            max_players: 8,
            total_rounds: 3,
            is_private: false,
            nickname: None,
        })
    }

    fn snapshot(room: Room, round: Option<Round>) -> PollEvent {
        PollEvent::Snapshot {
            room_id: room.id,
            room,
            round,
        }
    }

    #[tokio::test]
    async fn test_start_without_token_shows_login() {
        // テスト項目: トークンがなければログイン画面が表示される
        // given (前提条件):
        let mut api = MockGameApi::new();
        api.expect_profile().never();
        let mut h = harness(api, None);

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Auth);
        assert_eq!(h.renderer.last_screen(), Some(Screen::Login));
    }

    #[tokio::test]
    async fn test_start_with_valid_token_shows_dashboard() {
        // テスト項目: 有効なトークンならダッシュボードのルーム一覧が表示される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        let mut h = harness(api, Some("good"));

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Dashboard);
        let Some(Screen::Dashboard(view)) = h.renderer.last_screen() else {
            panic!("expected dashboard");
        };
        assert_eq!(view.panel, DashboardPanel::Rooms);
        assert!(matches!(view.content, DashboardContent::Rooms { .. }));
    }

    #[tokio::test]
    async fn test_reconnection_offer_is_notified() {
        // テスト項目: 再接続可能なルームがあれば通知される
        // given (前提条件):
        let mut api = MockGameApi::new();
        api.expect_profile().returning(|_| Ok(user(1)));
        api.expect_check_reconnection().returning(|_| {
            Ok(Some(Reconnection {
                room_id: room_id(),
                room_name: "Friday".to_string(),
                room_status: "in_progress".to_string(),
            }))
        });
        api.expect_user_rooms()
            .returning(|_| Ok(UserRooms::default()));
        api.expect_list_rooms().returning(|_| Ok(Vec::new()));
        let mut h = harness(api, Some("good"));

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert!(
            h.renderer
                .notifications()
                .iter()
                .any(|n| n.message.contains("resume"))
        );
    }

    #[tokio::test]
    async fn test_reconnection_check_unauthorized_returns_to_login() {
        // テスト項目: 再接続確認で 401 が返るとダッシュボードを読み込まずログイン画面に戻る
        // given (前提条件):
        let mut api = MockGameApi::new();
        api.expect_profile().returning(|_| Ok(user(1)));
        api.expect_check_reconnection()
            .returning(|_| Err(ApiError::Unauthorized));
        api.expect_list_rooms().never();
        let mut h = harness(api, Some("good"));

        // when (操作):
        h.controller.start().await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Auth);
        assert!(h.controller.session().is_none());
        assert_eq!(h.renderer.last_screen(), Some(Screen::Login));
        assert!(h.store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_create_room_enters_lobby_and_polls() {
        // テスト項目: ルーム作成でロビーに入り、ポーリングが開始される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 1));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;

        // when (操作):
        h.controller.handle_command(create_command()).await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Lobby);
        assert!(h.controller.is_polling());
        assert_eq!(
            h.controller.poll_target(),
            Some(PollTarget {
                room_id: room_id(),
                include_round: false
            })
        );
        let Some(Screen::Lobby(view)) = h.renderer.last_screen() else {
            panic!("expected lobby");
        };
        assert_eq!(
            view.start_game,
            Control::Disabled("Start Game (1/3 players)".to_string())
        );
    }

    #[tokio::test]
    async fn test_stale_poll_result_is_dropped() {
        // テスト項目: アクティブでないルームのポーリング結果は破棄される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 1));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;
        let rendered = h.renderer.screens().len();
        let mut stale = room(RoomStatus::InProgress, 1, 3);
        stale.id = other_room_id();

        // when (操作):
        h.controller.handle_poll_event(snapshot(stale, None)).await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Lobby);
        assert_eq!(h.renderer.screens().len(), rendered);
    }

    #[tokio::test]
    async fn test_poll_without_active_room_is_dropped() {
        // テスト項目: アクティブなルームがない場合、ポーリング結果は破棄される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        let mut h = harness(api, Some("good"));
        h.controller.start().await;

        // when (操作):
        h.controller
            .handle_poll_event(snapshot(room(RoomStatus::InProgress, 1, 3), None))
            .await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Dashboard);
        assert!(h.controller.active_room().is_none());
    }

    #[tokio::test]
    async fn test_poll_unauthorized_returns_to_auth() {
        // テスト項目: ポーリング中の 401 でトークンが削除され、ログイン画面に戻る
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 1));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller
            .handle_poll_event(PollEvent::Failed {
                room_id: room_id(),
                error: ApiError::Unauthorized,
            })
            .await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Auth);
        assert!(h.controller.session().is_none());
        assert!(!h.controller.is_polling());
        assert_eq!(h.controller.poll_target(), None);
        assert!(h.store.current().await.is_none());
        assert_eq!(h.renderer.last_screen(), Some(Screen::Login));
    }

    #[tokio::test]
    async fn test_lobby_moves_to_playing_and_polls_round() {
        // テスト項目: ゲーム開始を検知するとプレイ画面に移り、ラウンドも取得対象になる
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 3));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller
            .handle_poll_event(snapshot(room(RoomStatus::InProgress, 1, 3), None))
            .await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Playing);
        assert_eq!(
            h.controller.poll_target(),
            Some(PollTarget {
                room_id: room_id(),
                include_round: true
            })
        );
    }

    #[tokio::test]
    async fn test_finished_room_fetches_results_once() {
        // テスト項目: 終了したルームの結果取得はルームごとに一度だけ
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 3));
        api.expect_round_results()
            .with(always(), eq(room_id()))
            .times(1)
            .returning(|_, _| Ok(results(3)));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller
            .handle_poll_event(snapshot(room(RoomStatus::Finished, 1, 3), None))
            .await;
        h.controller
            .handle_poll_event(snapshot(room(RoomStatus::Finished, 1, 3), None))
            .await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Results);
        let Some(Screen::Results(view)) = h.renderer.last_screen() else {
            panic!("expected results");
        };
        assert_eq!(view.standings, vec![("p1".to_string(), 10)]);
    }

    #[tokio::test]
    async fn test_room_closed_in_lobby_shows_room_scores_without_error() {
        // テスト項目: ロビーで閉じられたルームは結果が 404 でもエラー通知せずルームのスコアを表示する
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 2));
        api.expect_round_results().times(1).returning(|_, _| {
            Err(ApiError::Rejected {
                status: 404,
                message: "Not found.".to_string(),
            })
        });
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller
            .handle_poll_event(snapshot(room(RoomStatus::Finished, 1, 2), None))
            .await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Results);
        assert!(
            h.renderer
                .notifications()
                .iter()
                .all(|n| n.level != NotificationLevel::Error)
        );
        let Some(Screen::Results(view)) = h.renderer.last_screen() else {
            panic!("expected results");
        };
        assert_eq!(
            view.standings,
            vec![("p2".to_string(), 20), ("p1".to_string(), 10)]
        );
    }

    #[tokio::test]
    async fn test_round_results_fetched_once_per_round_number() {
        // テスト項目: ラウンド結果はラウンド番号ごとに一度だけ取得される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::InProgress, 1, 3));
        api.expect_round_results()
            .times(2)
            .returning(|_, _| Ok(results(1)));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;
        let playing = room(RoomStatus::InProgress, 1, 3);

        // when (操作):
        for number in [1, 1, 1, 2, 2] {
            h.controller
                .handle_poll_event(snapshot(
                    playing.clone(),
                    Some(round(number, RoundStatus::Results)),
                ))
                .await;
        }

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Playing);
    }

    #[tokio::test]
    async fn test_answer_sets_pending_until_next_poll() {
        // テスト項目: 回答成功で保留フラグが立ち、次のポーリングで解除される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::InProgress, 1, 3));
        api.expect_submit_answer()
            .with(always(), eq(room_id()), eq(42))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;
        let playing = room(RoomStatus::InProgress, 1, 3);
        h.controller
            .handle_poll_event(snapshot(
                playing.clone(),
                Some(round(1, RoundStatus::Answering)),
            ))
            .await;

        // when (操作):
        h.controller
            .handle_command(PlayerCommand::Answer("42".to_string()))
            .await;
        let after_answer = h.controller.pending();
        h.controller
            .handle_poll_event(snapshot(playing, Some(round(1, RoundStatus::Answering))))
            .await;

        // then (期待する結果):
        assert!(after_answer.answer);
        assert!(!h.controller.pending().any());
    }

    #[tokio::test]
    async fn test_answer_failure_notifies_without_pending() {
        // テスト項目: 回答が拒否されると通知され、保留フラグは立たない
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::InProgress, 1, 3));
        api.expect_submit_answer().times(1).returning(|_, _, _| {
            Err(ApiError::Rejected {
                status: 400,
                message: "You already answered".to_string(),
            })
        });
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;
        h.controller
            .handle_poll_event(snapshot(
                room(RoomStatus::InProgress, 1, 3),
                Some(round(1, RoundStatus::Answering)),
            ))
            .await;

        // when (操作):
        h.controller
            .handle_command(PlayerCommand::Answer("42".to_string()))
            .await;

        // then (期待する結果):
        assert!(!h.controller.pending().answer);
        let last = h.renderer.last_notification().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.message, "You already answered");
        assert_eq!(last.at_millis, NOW);
    }

    #[tokio::test]
    async fn test_non_host_cannot_start() {
        // テスト項目: ホストでないプレイヤーの開始はリクエストされない
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 2);
        api.expect_join_room()
            .returning(|_, _, _| Ok(room(RoomStatus::Waiting, 1, 3)));
        api.expect_start_game().never();
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller
            .handle_command(PlayerCommand::Join {
                room: RoomRef::Id(room_id()),
                nickname: "p2".to_string(),
            })
            .await;

        // when (操作):
        h.controller.handle_command(PlayerCommand::Start).await;

        // then (期待する結果):
        let Some(Screen::Lobby(view)) = h.renderer.last_screen() else {
            panic!("expected lobby");
        };
        assert_eq!(view.start_game, Control::Hidden);
        assert_eq!(
            h.renderer.last_notification().unwrap().message,
            "Only the host can start the game"
        );
    }

    #[tokio::test]
    async fn test_close_room_requires_confirmation() {
        // テスト項目: ルームを閉じるには confirm が必要で、他のコマンドで取り消される
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 3));
        api.expect_close_room()
            .with(always(), eq(room_id()))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller.handle_command(PlayerCommand::Close).await;
        h.controller.handle_command(PlayerCommand::Help).await;
        h.controller.handle_command(PlayerCommand::Confirm).await;
        let confirmed_without_request = !h.controller.pending().close_room;
        h.controller.handle_command(PlayerCommand::Close).await;
        h.controller.handle_command(PlayerCommand::Confirm).await;

        // then (期待する結果):
        assert!(confirmed_without_request);
        assert!(h.controller.pending().close_room);
    }

    #[tokio::test]
    async fn test_leave_returns_to_dashboard_and_stops_polling() {
        // テスト項目: ルーム退出でダッシュボードに戻り、ポーリングが止まる
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::Waiting, 1, 1));
        api.expect_leave_room().times(1).returning(|_, _| Ok(()));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;

        // when (操作):
        h.controller.handle_command(PlayerCommand::Leave).await;

        // then (期待する結果):
        assert_eq!(h.controller.phase(), Phase::Dashboard);
        assert!(!h.controller.is_polling());
        assert!(h.controller.active_room().is_none());
    }

    #[tokio::test]
    async fn test_vote_by_index_targets_candidate() {
        // テスト項目: 番号で指定した候補者に投票される（自分は候補に含まれない）
        // given (前提条件):
        let mut api = MockGameApi::new();
        expect_session(&mut api, 1);
        expect_created(&mut api, room(RoomStatus::InProgress, 1, 3));
        api.expect_submit_vote()
            .with(always(), eq(room_id()), eq(PlayerId(102)))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut h = harness(api, Some("good"));
        h.controller.start().await;
        h.controller.handle_command(create_command()).await;
        h.controller
            .handle_poll_event(snapshot(
                room(RoomStatus::InProgress, 1, 3),
                Some(round(1, RoundStatus::Voting)),
            ))
            .await;

        // when (操作):
        h.controller
            .handle_command(PlayerCommand::Vote(VoteTarget::Index(1)))
            .await;

        // then (期待する結果):
        assert!(h.controller.pending().vote);
    }

    #[tokio::test]
    async fn test_commands_before_login_are_refused() {
        // テスト項目: ログイン前のコマンドはリクエストせずに拒否される
        // given (前提条件):
        let mut api = MockGameApi::new();
        api.expect_list_rooms().never();
        let mut h = harness(api, None);
        h.controller.start().await;

        // when (操作):
        let flow = h.controller.handle_command(PlayerCommand::Rooms).await;

        // then (期待する結果):
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            h.renderer.last_notification().unwrap().message,
            "Log in first"
        );
    }
}
