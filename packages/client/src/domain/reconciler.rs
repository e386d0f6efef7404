//! Game-phase reconciler.
//!
//! Pure mapping from the last polled server state to the local phase,
//! the in-game sub-panel, and the view-model the renderer draws. Nothing
//! here performs I/O.

use super::{
    entity::{Player, Room, Round, RoundResults, Session, User},
    host::HostSignals,
    phase::{Phase, SubPanel},
    view::{
        AnswerLine, Control, FinalResultsView, LobbyView, PendingActions, PlayerLine, RoundView,
        Screen, VoteCandidate,
    },
};

/// Minimum room size for "Start Game". The backend enforces the same rule.
pub const MIN_PLAYERS_TO_START: usize = 3;

/// Inputs of one reconciliation
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput<'a> {
    pub session: &'a Session,
    pub room: &'a Room,
    pub round: Option<&'a Round>,
    pub round_results: Option<&'a RoundResults>,
    pub pending: &'a PendingActions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub phase: Phase,
    pub sub_panel: Option<SubPanel>,
    pub screen: Screen,
}

pub fn reconcile(input: &ReconcileInput<'_>) -> Reconciled {
    let phase = Phase::for_room_status(input.room.status);
    let signals = HostSignals::collect(&input.session.user, input.room);

    match phase {
        Phase::Lobby => Reconciled {
            phase,
            sub_panel: None,
            screen: Screen::Lobby(lobby_view(input, signals)),
        },
        Phase::Playing => {
            let view = round_view(input, signals);
            Reconciled {
                phase,
                sub_panel: view.panel,
                screen: Screen::Playing(view),
            }
        }
        // `for_room_status` only yields room phases
        Phase::Results | Phase::Auth | Phase::Dashboard => Reconciled {
            phase: Phase::Results,
            sub_panel: None,
            screen: Screen::Results(final_results_view(input.room, input.round_results)),
        },
    }
}

/// "Start Game" for the lobby.
pub fn start_game_control(signals: HostSignals, player_count: usize, pending: bool) -> Control {
    if !signals.is_host() {
        return Control::Hidden;
    }
    if pending {
        return Control::Pending("Starting...".to_string());
    }
    if player_count < MIN_PLAYERS_TO_START {
        return Control::Disabled(format!(
            "Start Game ({}/{} players)",
            player_count, MIN_PLAYERS_TO_START
        ));
    }
    Control::Enabled("Start Game".to_string())
}

pub fn close_room_control(signals: HostSignals, pending: bool) -> Control {
    if !signals.can_close_room() {
        Control::Hidden
    } else if pending {
        Control::Pending("Closing...".to_string())
    } else {
        Control::Enabled("Close Room".to_string())
    }
}

/// Answers in ascending numeric order.
pub fn sorted_answers(round: &Round) -> Vec<AnswerLine> {
    let mut answers: Vec<AnswerLine> = round
        .answers
        .iter()
        .map(|a| AnswerLine {
            nickname: a.nickname.clone(),
            value: a.value,
        })
        .collect();
    answers.sort_by_key(|a| a.value);
    answers
}

fn player_lines(room: &Room, user: &User) -> Vec<PlayerLine> {
    let self_id = room.player_for(user.id).map(|p| p.id);
    room.players
        .iter()
        .map(|p| PlayerLine {
            player_id: p.id,
            nickname: p.nickname.clone(),
            score: p.score,
            is_host: is_player_host(room, p),
            is_connected: p.is_connected,
            is_self: Some(p.id) == self_id,
        })
        .collect()
}

fn is_player_host(room: &Room, player: &Player) -> bool {
    player.is_host || (player.user_id.is_some() && player.user_id == room.host_id)
}

fn lobby_view(input: &ReconcileInput<'_>, signals: HostSignals) -> LobbyView {
    let room = input.room;
    LobbyView {
        room_id: room.id,
        room_name: room.name.clone(),
        room_code: room.room_code.clone(),
        player_count: room.player_count(),
        max_players: room.max_players,
        total_rounds: room.total_rounds,
        players: player_lines(room, &input.session.user),
        start_game: start_game_control(signals, room.player_count(), input.pending.start_game),
        close_room: close_room_control(signals, input.pending.close_room),
    }
}

fn round_view(input: &ReconcileInput<'_>, signals: HostSignals) -> RoundView {
    let room = input.room;
    let pending = input.pending;
    let panel = input
        .round
        .and_then(|r| SubPanel::from_round_status(&r.status));

    let mut scoreboard = player_lines(room, &input.session.user);
    scoreboard.sort_by(|a, b| b.score.cmp(&a.score));

    let mut view = RoundView {
        room_id: room.id,
        room_name: room.name.clone(),
        round_number: input.round.map_or(room.current_round, |r| r.number),
        total_rounds: room.total_rounds,
        panel,
        question: None,
        answer: Control::Hidden,
        answers: Vec::new(),
        start_voting: Control::Hidden,
        candidates: Vec::new(),
        vote: Control::Hidden,
        votes_cast: 0,
        voters_expected: room.players.iter().filter(|p| p.is_connected).count(),
        results: None,
        continue_round: Control::Hidden,
        scoreboard,
        close_room: close_room_control(signals, pending.close_room),
    };

    let (Some(round), Some(panel)) = (input.round, panel) else {
        return view;
    };

    view.question = round.question_text.clone();
    view.votes_cast = round.votes.len();

    match panel {
        SubPanel::Answering => {
            view.answer = if round.user_has_answered {
                Control::Disabled("Answer submitted".to_string())
            } else if pending.answer {
                Control::Pending("Submitting...".to_string())
            } else {
                Control::Enabled("Submit Answer".to_string())
            };
        }
        SubPanel::Discussion => {
            view.answers = sorted_answers(round);
            view.start_voting = if pending.start_voting {
                Control::Pending("Starting vote...".to_string())
            } else {
                Control::Enabled("Start Voting".to_string())
            };
        }
        SubPanel::Voting => {
            view.answers = sorted_answers(round);
            let self_id = room.player_for(input.session.user.id).map(|p| p.id);
            view.candidates = room
                .players
                .iter()
                .filter(|p| Some(p.id) != self_id)
                .map(|p| VoteCandidate {
                    player_id: p.id,
                    nickname: p.nickname.clone(),
                })
                .collect();
            view.vote = if round.user_has_voted {
                Control::Disabled("Vote submitted".to_string())
            } else if pending.vote {
                Control::Pending("Submitting vote...".to_string())
            } else {
                Control::Enabled("Submit Vote".to_string())
            };
        }
        SubPanel::Results => {
            view.results = input
                .round_results
                .filter(|r| r.round_number == round.number)
                .cloned();
            let label = if round.number >= room.total_rounds {
                "Finish Game"
            } else {
                "Next Round"
            };
            view.continue_round = if pending.continue_round {
                Control::Pending("Continuing...".to_string())
            } else {
                Control::Enabled(label.to_string())
            };
        }
    }

    view
}

fn final_results_view(room: &Room, results: Option<&RoundResults>) -> FinalResultsView {
    let standings = match results {
        Some(r) if !r.scores.is_empty() => r.scores.clone(),
        _ => {
            let mut scores: Vec<(String, i64)> = room
                .players
                .iter()
                .map(|p| (p.nickname.clone(), p.score))
                .collect();
            scores.sort_by(|a, b| b.1.cmp(&a.1));
            scores
        }
    };

    FinalResultsView {
        room_name: room.name.clone(),
        standings,
        last_round: results.cloned(),
    }
}
