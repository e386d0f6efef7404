//! Screen formatting for the terminal renderer.

use numberhunt_shared::time::{format_relative, format_server_timestamp, millis_to_clock};

use crate::domain::{
    Control, Notification, NotificationLevel, RoundResults, Screen, SubPanel,
    admin::{
        ActivityEntry, AdminGame, AdminGameDetail, AdminOverview, AdminPlayer, AdminPlayerDetail,
        DetailedStats, SystemInfo,
    },
    entity::{GameHistoryEntry, LeaderboardEntry},
    view::{
        AdminScreen, DashboardContent, DashboardView, FinalResultsView, LobbyView, PlayerLine,
        RoomLine, RoundView,
    },
};

const SEPARATOR: &str = "============================================================";
const THIN_SEPARATOR: &str = "------------------------------------------------------------";

/// Screen formatter for the terminal clients
pub struct ScreenFormatter;

impl ScreenFormatter {
    /// Format any player screen
    pub fn format_screen(screen: &Screen) -> String {
        match screen {
            Screen::Login => Self::format_login(),
            Screen::Dashboard(view) => Self::format_dashboard(view),
            Screen::Lobby(view) => Self::format_lobby(view),
            Screen::Playing(view) => Self::format_round(view),
            Screen::Results(view) => Self::format_final_results(view),
        }
    }

    pub fn format_login() -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", SEPARATOR));
        output.push_str("Number Hunt\n");
        output.push_str(&format!("{}\n", SEPARATOR));
        output.push_str("  login <username> <password>\n");
        output.push_str("  register <username> <email> <password> <password-again>\n");
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    pub fn format_dashboard(view: &DashboardView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", SEPARATOR));
        output.push_str(&format!("Dashboard - {}\n", view.username));
        output.push_str(&format!("{}\n", SEPARATOR));

        match &view.content {
            DashboardContent::Loading => output.push_str("Loading...\n"),
            DashboardContent::Rooms { current, available } => {
                if let Some(room) = current {
                    output.push_str("Your room:\n");
                    output.push_str(&format!("  {}\n", Self::format_room_line(room)));
                    output.push_str("  (type `resume` to go back in)\n\n");
                }
                output.push_str("Open rooms:\n");
                if available.is_empty() {
                    output.push_str("  (No rooms - `create <name>` to host one)\n");
                } else {
                    for (index, room) in available.iter().enumerate() {
                        output.push_str(&format!(
                            "  {:>2}. {}\n",
                            index + 1,
                            Self::format_room_line(room)
                        ));
                    }
                }
            }
            DashboardContent::History(entries) => {
                output.push_str("Game history:\n");
                output.push_str(&Self::format_history(entries));
            }
            DashboardContent::Leaderboard { period, entries } => {
                output.push_str(&format!("Leaderboard ({}):\n", period.as_query()));
                output.push_str(&Self::format_leaderboard(entries));
            }
        }

        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    /// Format one room of the room list
    ///
    /// # Arguments
    ///
    /// * `room` - The room line to format
    ///
    /// # Returns
    ///
    /// A single line with name, occupancy and status
    pub fn format_room_line(room: &RoomLine) -> String {
        let mut line = format!(
            "{} [{}/{}] {}",
            room.name,
            room.player_count,
            room.max_players,
            room.status.label()
        );
        if room.is_private {
            line.push_str(" (private)");
        }
        if room.is_member {
            line.push_str(" (joined)");
        }
        line.push_str(&format!(" - {}", room.room_id));
        line
    }

    pub fn format_history(entries: &[GameHistoryEntry]) -> String {
        if entries.is_empty() {
            return "  (No games played yet)\n".to_string();
        }
        let mut output = String::new();
        for entry in entries {
            output.push_str(&format!(
                "  {} {} round {}: {} as {} ({:+} pts){}\n",
                format_server_timestamp(entry.created_at.as_deref()),
                entry.room_name,
                entry.round_number,
                entry.result,
                entry.role,
                entry.points_earned,
                if entry.was_voted_out {
                    ", voted out"
                } else {
                    ""
                }
            ));
        }
        output
    }

    pub fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
        if entries.is_empty() {
            return "  (No entries)\n".to_string();
        }
        let mut output = String::new();
        for entry in entries {
            output.push_str(&format!(
                "  {:>3}. {:<20} {:>6} pts  {} games  {} wins  {:.1}%\n",
                entry.rank,
                entry.username,
                entry.total_score,
                entry.total_games,
                entry.total_wins,
                entry.win_rate
            ));
        }
        output
    }

    pub fn format_lobby(view: &LobbyView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", SEPARATOR));
        output.push_str(&format!("Lobby: {}\n", view.room_name));
        if let Some(code) = &view.room_code {
            output.push_str(&format!("Room code: {}\n", code));
        }
        output.push_str(&format!(
            "Players {}/{} - {} rounds\n",
            view.player_count, view.max_players, view.total_rounds
        ));
        output.push_str(&format!("{}\n", SEPARATOR));
        output.push_str(&Self::format_players(&view.players));
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        let controls = [
            Self::format_control(&view.start_game, "start"),
            Self::format_control(&view.close_room, "close"),
        ];
        for control in controls.into_iter().flatten() {
            output.push_str(&format!("{}\n", control));
        }
        output.push_str("  `leave` to leave the room\n");
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    pub fn format_players(players: &[PlayerLine]) -> String {
        if players.is_empty() {
            return "  (No players)\n".to_string();
        }
        let mut output = String::new();
        for player in players {
            let mut markers = Vec::new();
            if player.is_host {
                markers.push("host");
            }
            if player.is_self {
                markers.push("me");
            }
            if !player.is_connected {
                markers.push("away");
            }
            let suffix = if markers.is_empty() {
                String::new()
            } else {
                format!(" ({})", markers.join(", "))
            };
            output.push_str(&format!(
                "  {}{} - {} pts\n",
                player.nickname, suffix, player.score
            ));
        }
        output
    }

    /// Format a control as a command hint
    ///
    /// # Arguments
    ///
    /// * `control` - Control state from the view-model
    /// * `command` - Command that triggers the control
    ///
    /// # Returns
    ///
    /// `None` for hidden controls
    pub fn format_control(control: &Control, command: &str) -> Option<String> {
        match control {
            Control::Hidden => None,
            Control::Enabled(label) => Some(format!("  [{}] type `{}`", label, command)),
            Control::Disabled(label) => Some(format!("  [{}] (disabled)", label)),
            Control::Pending(label) => Some(format!("  [{}]", label)),
        }
    }

    pub fn format_round(view: &RoundView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", SEPARATOR));
        output.push_str(&format!(
            "{} - Round {}/{}\n",
            view.room_name, view.round_number, view.total_rounds
        ));
        output.push_str(&format!("{}\n", SEPARATOR));

        match view.panel {
            None => output.push_str("Waiting for the round...\n"),
            Some(SubPanel::Answering) => {
                output.push_str("Answering\n");
                if let Some(question) = &view.question {
                    output.push_str(&format!("Q: {}\n", question));
                }
                if let Some(control) = Self::format_control(&view.answer, "answer <number>") {
                    output.push_str(&format!("{}\n", control));
                }
            }
            Some(SubPanel::Discussion) => {
                output.push_str("Discussion\n");
                if let Some(question) = &view.question {
                    output.push_str(&format!("Q: {}\n", question));
                }
                output.push_str(&Self::format_answers(view));
                if let Some(control) = Self::format_control(&view.start_voting, "vote-start") {
                    output.push_str(&format!("{}\n", control));
                }
            }
            Some(SubPanel::Voting) => {
                output.push_str(&format!(
                    "Voting ({}/{} votes)\n",
                    view.votes_cast, view.voters_expected
                ));
                output.push_str(&Self::format_answers(view));
                output.push_str("Who is the imposter?\n");
                for (index, candidate) in view.candidates.iter().enumerate() {
                    output.push_str(&format!("  {:>2}. {}\n", index + 1, candidate.nickname));
                }
                if let Some(control) = Self::format_control(&view.vote, "vote <number|nickname>") {
                    output.push_str(&format!("{}\n", control));
                }
            }
            Some(SubPanel::Results) => {
                output.push_str("Round results\n");
                match &view.results {
                    Some(results) => output.push_str(&Self::format_round_results(results)),
                    None => output.push_str("Loading results...\n"),
                }
                if let Some(control) = Self::format_control(&view.continue_round, "continue") {
                    output.push_str(&format!("{}\n", control));
                }
            }
        }

        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str("Scores:\n");
        output.push_str(&Self::format_players(&view.scoreboard));
        if let Some(control) = Self::format_control(&view.close_room, "close") {
            output.push_str(&format!("{}\n", control));
        }
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    fn format_answers(view: &RoundView) -> String {
        if view.answers.is_empty() {
            return "  (No answers yet)\n".to_string();
        }
        let mut output = String::from("Answers:\n");
        for answer in &view.answers {
            output.push_str(&format!("  {:>6}  {}\n", answer.value, answer.nickname));
        }
        output
    }

    pub fn format_round_results(results: &RoundResults) -> String {
        let mut output = String::new();
        output.push_str(&format!("Question: {}\n", results.question_text));
        if !results.decoy_question_text.is_empty() {
            output.push_str(&format!(
                "Imposter's question: {}\n",
                results.decoy_question_text
            ));
        }
        for answer in &results.answers {
            output.push_str(&format!(
                "  {:>6}  {}{}\n",
                answer.value,
                answer.nickname,
                if answer.is_imposter { " (imposter)" } else { "" }
            ));
        }
        let verdict = if results.imposter_caught {
            "caught"
        } else {
            "escaped"
        };
        output.push_str(&format!(
            "The imposter was {} and {}.\n",
            results.imposter_nickname, verdict
        ));
        if let Some(most_voted) = &results.most_voted_nickname {
            output.push_str(&format!(
                "Most votes: {} ({} votes cast)\n",
                most_voted, results.total_votes
            ));
        }
        output
    }

    pub fn format_final_results(view: &FinalResultsView) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", SEPARATOR));
        output.push_str(&format!("Game over: {}\n", view.room_name));
        output.push_str(&format!("{}\n", SEPARATOR));
        for (index, (nickname, score)) in view.standings.iter().enumerate() {
            output.push_str(&format!("  {:>2}. {} - {} pts\n", index + 1, nickname, score));
        }
        if let Some(last) = &view.last_round {
            output.push_str(&format!("{}\n", THIN_SEPARATOR));
            output.push_str(&format!("Last round ({}):\n", last.round_number));
            output.push_str(&Self::format_round_results(last));
        }
        output.push_str("  `ok` to return to the dashboard\n");
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    /// Format a toast notification
    ///
    /// # Arguments
    ///
    /// * `notification` - The notification to display
    ///
    /// # Returns
    ///
    /// A formatted line with level marker and local clock time
    pub fn format_notification(notification: &Notification) -> String {
        let marker = match notification.level {
            NotificationLevel::Info => "i",
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✗",
        };
        format!(
            "\n{} {} ({})\n",
            marker,
            notification.message,
            millis_to_clock(notification.at_millis)
        )
    }

    /// Format any admin screen
    ///
    /// # Arguments
    ///
    /// * `screen` - The admin screen
    /// * `now_millis` - Current time, for relative activity timestamps
    pub fn format_admin(screen: &AdminScreen, now_millis: i64) -> String {
        let body = match screen {
            AdminScreen::Login => {
                return "\nAdmin login required: login <username> <password>\n".to_string();
            }
            AdminScreen::Loading(panel) => format!("Loading {:?}...\n", panel),
            AdminScreen::Overview { overview, activity } => {
                Self::format_overview(overview, activity, now_millis)
            }
            AdminScreen::Players(players) => Self::format_admin_players(players),
            AdminScreen::PlayerDetail(detail) => Self::format_admin_player_detail(detail),
            AdminScreen::Games(games) => Self::format_admin_games(games),
            AdminScreen::GameDetail(detail) => Self::format_admin_game_detail(detail),
            AdminScreen::Stats(stats) => Self::format_stats(stats),
            AdminScreen::System(info) => Self::format_system(info),
        };
        format!("\n{}\n{}{}\n", SEPARATOR, body, SEPARATOR)
    }

    pub fn format_overview(
        overview: &AdminOverview,
        activity: &[ActivityEntry],
        now_millis: i64,
    ) -> String {
        let mut output = String::from("Overview\n");
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str(&format!("  Users:        {}\n", overview.total_users));
        output.push_str(&format!("  Games:        {}\n", overview.total_games));
        output.push_str(&format!("  Active games: {}\n", overview.active_games));
        output.push_str(&format!("  Rounds:       {}\n", overview.total_rounds));
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str("Recent activity:\n");
        if activity.is_empty() {
            output.push_str("  (No recent activity)\n");
        }
        for entry in activity {
            output.push_str(&format!(
                "  {:<12} {}\n",
                format_relative(&entry.timestamp, now_millis),
                entry.description
            ));
        }
        output
    }

    pub fn format_admin_players(players: &[AdminPlayer]) -> String {
        let mut output = String::from("Players\n");
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        if players.is_empty() {
            output.push_str("  (No players)\n");
        }
        for player in players {
            output.push_str(&format!(
                "  #{:<5} {:<20} {:>4} games {:>5.1}% {}{}\n",
                player.id,
                player.username,
                player.games_played,
                player.win_rate,
                if player.is_online { "online" } else { "offline" },
                if player.is_active { "" } else { " (deactivated)" }
            ));
        }
        output
    }

    pub fn format_admin_player_detail(detail: &AdminPlayerDetail) -> String {
        let mut output = format!("Player #{}: {}\n", detail.id, detail.username);
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        let full_name = format!("{} {}", detail.first_name, detail.last_name);
        if !full_name.trim().is_empty() {
            output.push_str(&format!("  Name:        {}\n", full_name.trim()));
        }
        output.push_str(&format!("  Email:       {}\n", detail.email));
        output.push_str(&format!(
            "  Joined:      {}\n",
            format_server_timestamp(detail.date_joined.as_deref())
        ));
        output.push_str(&format!(
            "  Last active: {}\n",
            format_server_timestamp(detail.last_active.as_deref())
        ));
        output.push_str(&format!(
            "  Status:      {}\n",
            if detail.is_active {
                "active"
            } else {
                "deactivated"
            }
        ));
        output.push_str(&format!(
            "  Games:       {} played, {} won ({:.1}%)\n",
            detail.games_played, detail.games_won, detail.win_rate
        ));
        output.push_str(&format!("  Score:       {}\n", detail.total_score));
        output
    }

    fn format_game_line(game: &AdminGame) -> String {
        format!(
            "  {} {:<20} host {:<12} {}/{} players round {}/{} {}",
            game.id,
            game.name,
            game.host.username,
            game.player_count,
            game.max_players,
            game.current_round,
            game.total_rounds,
            game.status.label()
        )
    }

    pub fn format_admin_games(games: &[AdminGame]) -> String {
        let mut output = String::from("Games\n");
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        if games.is_empty() {
            output.push_str("  (No games)\n");
        }
        for game in games {
            output.push_str(&format!("{}\n", Self::format_game_line(game)));
        }
        output
    }

    pub fn format_admin_game_detail(detail: &AdminGameDetail) -> String {
        let game = &detail.game;
        let mut output = format!("Game: {}\n", game.name);
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str(&format!("{}\n", Self::format_game_line(game)));
        output.push_str(&format!(
            "  Created:  {}\n",
            format_server_timestamp(game.created_at.as_deref())
        ));
        output.push_str(&format!(
            "  Started:  {}\n",
            format_server_timestamp(game.started_at.as_deref())
        ));
        output.push_str(&format!(
            "  Finished: {}\n",
            format_server_timestamp(game.finished_at.as_deref())
        ));
        output.push_str("Players:\n");
        for player in &detail.players {
            output.push_str(&format!(
                "  {} ({}){}\n",
                player.nickname,
                player.user,
                if player.is_connected { "" } else { " away" }
            ));
        }
        output
    }

    pub fn format_stats(stats: &DetailedStats) -> String {
        fn or_dash(value: Option<String>) -> String {
            value.unwrap_or_else(|| "-".to_string())
        }

        let mut output = String::from("Statistics\n");
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str(&format!(
            "  Avg game duration:    {}\n",
            or_dash(stats.avg_game_duration.map(|v| format!("{:.1} min", v)))
        ));
        output.push_str(&format!(
            "  Avg players per game: {}\n",
            or_dash(stats.avg_players_per_game.map(|v| format!("{:.1}", v)))
        ));
        output.push_str(&format!(
            "  Imposter win rate:    {}\n",
            or_dash(stats.imposter_win_rate.map(|v| format!("{:.1}%", v)))
        ));
        output.push_str(&format!(
            "  Most active hour:     {}\n",
            or_dash(stats.most_active_hour.map(|h| format!("{:02}:00", h)))
        ));
        output.push_str("Top players:\n");
        if stats.top_players.is_empty() {
            output.push_str("  (No players)\n");
        }
        for (index, player) in stats.top_players.iter().enumerate() {
            output.push_str(&format!(
                "  {:>2}. {} - {} pts ({} games)\n",
                index + 1,
                player.username,
                player.total_score,
                player.games_played
            ));
        }
        output
    }

    pub fn format_system(info: &SystemInfo) -> String {
        let mut output = String::from("System\n");
        output.push_str(&format!("{}\n", THIN_SEPARATOR));
        output.push_str(&format!("  Tables:  {}\n", info.total_tables));
        output.push_str(&format!("  Records: {}\n", info.total_records));
        output.push_str(&format!(
            "  DB size: {}\n",
            info.db_size.as_deref().unwrap_or("-")
        ));
        output.push_str("Recent logs:\n");
        for line in &info.recent_logs {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeaderboardPeriod, PlayerId, RoomId, RoomStatus, entity::RevealedAnswer};
    use uuid::Uuid;

    fn player_line(nickname: &str, score: i64, is_host: bool, is_self: bool) -> PlayerLine {
        PlayerLine {
            player_id: PlayerId(1),
            nickname: nickname.to_string(),
            score,
            is_host,
            is_connected: true,
            is_self,
        }
    }

    fn lobby(start_game: Control) -> LobbyView {
        LobbyView {
            room_id: RoomId::new(Uuid::nil()),
            room_name: "Friday".to_string(),
            room_code: Some("AB12CD".to_string()),
            player_count: 1,
            max_players: 6,
            total_rounds: 5,
            players: vec![player_line("alice", 0, true, true)],
            start_game,
            close_room: Control::Hidden,
        }
    }

    #[test]
    fn test_format_lobby_shows_disabled_start_label() {
        // テスト項目: 人数不足の開始ボタンはラベル付きで無効表示される
        // given (前提条件):
        let view = lobby(Control::Disabled("Start Game (1/3 players)".to_string()));

        // when (操作):
        let result = ScreenFormatter::format_lobby(&view);

        // then (期待する結果):
        assert!(result.contains("[Start Game (1/3 players)] (disabled)"));
        assert!(result.contains("Room code: AB12CD"));
        assert!(result.contains("alice (host, me)"));
        assert!(!result.contains("close"));
    }

    #[test]
    fn test_format_lobby_hides_hidden_controls() {
        // テスト項目: 非表示のコントロールは出力されない
        // given (前提条件):
        let view = lobby(Control::Hidden);

        // when (操作):
        let result = ScreenFormatter::format_lobby(&view);

        // then (期待する結果):
        assert!(!result.contains("Start Game"));
        assert!(result.contains(SEPARATOR));
    }

    #[test]
    fn test_format_control_variants() {
        // テスト項目: コントロールの状態ごとに表示が変わる
        // given (前提条件):
        let enabled = Control::Enabled("Start Game".to_string());
        let pending = Control::Pending("Starting...".to_string());

        // when (操作):
        let enabled_text = ScreenFormatter::format_control(&enabled, "start");
        let pending_text = ScreenFormatter::format_control(&pending, "start");
        let hidden_text = ScreenFormatter::format_control(&Control::Hidden, "start");

        // then (期待する結果):
        assert_eq!(enabled_text.unwrap(), "  [Start Game] type `start`");
        assert_eq!(pending_text.unwrap(), "  [Starting...]");
        assert!(hidden_text.is_none());
    }

    #[test]
    fn test_format_round_results_marks_imposter() {
        // テスト項目: ラウンド結果でインポスターに印が付き、捕まったかが表示される
        // given (前提条件):
        let results = RoundResults {
            round_number: 2,
            question_text: "How many pets?".to_string(),
            decoy_question_text: "How many shoes?".to_string(),
            answers: vec![
                RevealedAnswer {
                    player_id: PlayerId(1),
                    nickname: "alice".to_string(),
                    value: 2,
                    is_imposter: false,
                },
                RevealedAnswer {
                    player_id: PlayerId(2),
                    nickname: "bob".to_string(),
                    value: 12,
                    is_imposter: true,
                },
            ],
            imposter_nickname: "bob".to_string(),
            imposter_caught: true,
            most_voted_nickname: Some("bob".to_string()),
            total_votes: 3,
            scores: Vec::new(),
        };

        // when (操作):
        let result = ScreenFormatter::format_round_results(&results);

        // then (期待する結果):
        assert!(result.contains("bob (imposter)"));
        assert!(result.contains("The imposter was bob and caught."));
        assert!(result.contains("Imposter's question: How many shoes?"));
    }

    #[test]
    fn test_format_dashboard_numbers_rooms() {
        // テスト項目: ルーム一覧は番号付きで表示される
        // given (前提条件):
        let view = DashboardView {
            username: "alice".to_string(),
            panel: crate::domain::view::DashboardPanel::Rooms,
            content: DashboardContent::Rooms {
                current: None,
                available: vec![RoomLine {
                    room_id: RoomId::new(Uuid::nil()),
                    name: "Friday".to_string(),
                    status: RoomStatus::Waiting,
                    player_count: 2,
                    max_players: 6,
                    is_private: false,
                    is_member: false,
                }],
            },
        };

        // when (操作):
        let result = ScreenFormatter::format_dashboard(&view);

        // then (期待する結果):
        assert!(result.contains(" 1. Friday [2/6] waiting"));
        assert!(result.contains("Dashboard - alice"));
    }

    #[test]
    fn test_format_leaderboard_empty() {
        // テスト項目: ランキングが空の場合、適切なメッセージが表示される
        // given (前提条件):
        let view = DashboardView {
            username: "alice".to_string(),
            panel: crate::domain::view::DashboardPanel::Leaderboard,
            content: DashboardContent::Leaderboard {
                period: LeaderboardPeriod::Weekly,
                entries: Vec::new(),
            },
        };

        // when (操作):
        let result = ScreenFormatter::format_dashboard(&view);

        // then (期待する結果):
        assert!(result.contains("Leaderboard (weekly)"));
        assert!(result.contains("(No entries)"));
    }

    #[test]
    fn test_format_notification() {
        // テスト項目: 通知はレベル記号と時刻付きで表示される
        // given (前提条件):
        let notification = Notification {
            level: NotificationLevel::Error,
            message: "Room is full".to_string(),
            at_millis: 1672498800000,
        };

        // when (操作):
        let result = ScreenFormatter::format_notification(&notification);

        // then (期待する結果):
        assert!(result.contains("✗ Room is full"));
        assert!(result.contains("15:00:00"));
    }

    #[test]
    fn test_format_overview_uses_relative_time() {
        // テスト項目: 概要のアクティビティは相対時刻で表示される
        // given (前提条件):
        let overview = AdminOverview {
            total_users: 3,
            total_games: 1,
            active_games: 1,
            total_rounds: 2,
        };
        let activity = vec![ActivityEntry {
            timestamp: "2023-01-01T00:00:00Z".to_string(),
            description: "New user registered: dave".to_string(),
        }];
        let now = 1672531200000 + 5 * 60 * 1000;

        // when (操作):
        let result = ScreenFormatter::format_overview(&overview, &activity, now);

        // then (期待する結果):
        assert!(result.contains("5 min ago"));
        assert!(result.contains("New user registered: dave"));
        assert!(result.contains("Active games: 1"));
    }
}
