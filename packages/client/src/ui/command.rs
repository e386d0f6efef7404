//! Line command parsing for the terminal clients.
//!
//! Parsing only checks shape (arity, numbers, ids). Domain rules such as
//! "answer must be positive" live in the usecase validators.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{
    LeaderboardPeriod, NewRoom, Registration, RoomId,
    admin::{CleanupTarget, ExportKind},
};
use crate::usecase::game_actions::DEFAULT_LEADERBOARD_LIMIT;

pub const DEFAULT_MAX_PLAYERS: u32 = 8;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type `help` for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

/// Room picked from the dashboard list (1-based) or by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomRef {
    Index(usize),
    Id(RoomId),
}

/// Vote target: position in the candidate list (1-based) or nickname
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    Index(usize),
    Nickname(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Login { username: String, password: String },
    Register(Registration),
    Logout,
    Rooms,
    History,
    Leaderboard { period: LeaderboardPeriod, limit: u32 },
    Create(NewRoom),
    Join { room: RoomRef, nickname: String },
    JoinByCode { code: String, nickname: String },
    /// Re-enter the room the user already belongs to
    Resume,
    Leave,
    Start,
    Close,
    /// Raw input, validated by the usecase
    Answer(String),
    StartVoting,
    Vote(VoteTarget),
    Continue,
    /// Dismiss the final results
    Acknowledge,
    Confirm,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Login { username: String, password: String },
    Logout,
    Overview,
    Players,
    Player(i64),
    Activate(i64),
    Deactivate(i64),
    Games,
    Game(RoomId),
    End(RoomId),
    Stats,
    System,
    Cleanup(CleanupTarget),
    Export {
        kind: ExportKind,
        output: Option<PathBuf>,
    },
    Confirm,
    Help,
    Quit,
}

pub const PLAYER_HELP: &str = "\
Commands:
  login <username> <password>
  register <username> <email> <password> <password-again>
  logout
  rooms | history | leaderboard [daily|weekly|monthly|all] [limit]
  create <name> [max-players] [rounds] [private]
  join <number|room-id> <nickname>
  code <room-code> <nickname>
  resume
  leave | start | close
  answer <number>
  vote-start | vote <number|nickname> | continue
  ok            return to the dashboard from the final results
  confirm       confirm a destructive action
  help | quit
";

pub const ADMIN_HELP: &str = "\
Commands:
  login <username> <password> | logout
  overview | players | games | stats | system
  player <id> | activate <id> | deactivate <id>
  game <room-id> | end <room-id>
  cleanup sessions|games
  export players|games [file]
  confirm       confirm a destructive action
  help | quit
";

pub fn parse_player_command(line: &str) -> Result<PlayerCommand, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Err(CommandError::Usage("help"));
    };

    match name.to_ascii_lowercase().as_str() {
        "login" => match args {
            [username, password] => Ok(PlayerCommand::Login {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(CommandError::Usage("login <username> <password>")),
        },
        "register" => match args {
            [username, email, password, password_confirm] => {
                Ok(PlayerCommand::Register(Registration {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    password_confirm: password_confirm.to_string(),
                }))
            }
            _ => Err(CommandError::Usage(
                "register <username> <email> <password> <password-again>",
            )),
        },
        "logout" => Ok(PlayerCommand::Logout),
        "rooms" | "dashboard" => Ok(PlayerCommand::Rooms),
        "history" => Ok(PlayerCommand::History),
        "leaderboard" | "top" => parse_leaderboard(args),
        "create" => parse_create(args).map(PlayerCommand::Create),
        "join" => match args {
            [room, nickname @ ..] if !nickname.is_empty() => Ok(PlayerCommand::Join {
                room: parse_room_ref(room)?,
                nickname: nickname.join(" "),
            }),
            _ => Err(CommandError::Usage("join <number|room-id> <nickname>")),
        },
        "code" => match args {
            [code, nickname @ ..] if !nickname.is_empty() => Ok(PlayerCommand::JoinByCode {
                code: code.to_string(),
                nickname: nickname.join(" "),
            }),
            _ => Err(CommandError::Usage("code <room-code> <nickname>")),
        },
        "resume" => Ok(PlayerCommand::Resume),
        "leave" => Ok(PlayerCommand::Leave),
        "start" => Ok(PlayerCommand::Start),
        "close" => Ok(PlayerCommand::Close),
        "answer" => match args {
            [value] => Ok(PlayerCommand::Answer(value.to_string())),
            _ => Err(CommandError::Usage("answer <number>")),
        },
        "vote-start" | "start-voting" => Ok(PlayerCommand::StartVoting),
        "vote" => match args {
            [] => Err(CommandError::Usage("vote <number|nickname>")),
            [target] => Ok(PlayerCommand::Vote(match target.parse::<usize>() {
                Ok(index) => VoteTarget::Index(index),
                Err(_) => VoteTarget::Nickname(target.to_string()),
            })),
            words => Ok(PlayerCommand::Vote(VoteTarget::Nickname(words.join(" ")))),
        },
        "continue" | "next" => Ok(PlayerCommand::Continue),
        "ok" | "back" => Ok(PlayerCommand::Acknowledge),
        "confirm" | "yes" => Ok(PlayerCommand::Confirm),
        "help" | "?" => Ok(PlayerCommand::Help),
        "quit" | "exit" => Ok(PlayerCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

pub fn parse_admin_command(line: &str) -> Result<AdminCommand, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Err(CommandError::Usage("help"));
    };

    match name.to_ascii_lowercase().as_str() {
        "login" => match args {
            [username, password] => Ok(AdminCommand::Login {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(CommandError::Usage("login <username> <password>")),
        },
        "logout" => Ok(AdminCommand::Logout),
        "overview" => Ok(AdminCommand::Overview),
        "players" => Ok(AdminCommand::Players),
        "player" => parse_player_id(args, "player <id>").map(AdminCommand::Player),
        "activate" => parse_player_id(args, "activate <id>").map(AdminCommand::Activate),
        "deactivate" => parse_player_id(args, "deactivate <id>").map(AdminCommand::Deactivate),
        "games" => Ok(AdminCommand::Games),
        "game" => parse_game_id(args, "game <room-id>").map(AdminCommand::Game),
        "end" => parse_game_id(args, "end <room-id>").map(AdminCommand::End),
        "stats" => Ok(AdminCommand::Stats),
        "system" => Ok(AdminCommand::System),
        "cleanup" => match args {
            ["sessions"] => Ok(AdminCommand::Cleanup(CleanupTarget::Sessions)),
            ["games"] => Ok(AdminCommand::Cleanup(CleanupTarget::Games)),
            _ => Err(CommandError::Usage("cleanup sessions|games")),
        },
        "export" => {
            let (kind, rest) = match args {
                ["players", rest @ ..] => (ExportKind::Players, rest),
                ["games", rest @ ..] => (ExportKind::Games, rest),
                _ => return Err(CommandError::Usage("export players|games [file]")),
            };
            match rest {
                [] => Ok(AdminCommand::Export { kind, output: None }),
                [path] => Ok(AdminCommand::Export {
                    kind,
                    output: Some(PathBuf::from(path)),
                }),
                _ => Err(CommandError::Usage("export players|games [file]")),
            }
        }
        "confirm" | "yes" => Ok(AdminCommand::Confirm),
        "help" | "?" => Ok(AdminCommand::Help),
        "quit" | "exit" => Ok(AdminCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_room_ref(value: &str) -> Result<RoomRef, CommandError> {
    if let Ok(index) = value.parse::<usize>() {
        return Ok(RoomRef::Index(index));
    }
    RoomId::parse(value)
        .map(RoomRef::Id)
        .map_err(|e| CommandError::Invalid(e.to_string()))
}

fn parse_leaderboard(args: &[&str]) -> Result<PlayerCommand, CommandError> {
    const USAGE: &str = "leaderboard [daily|weekly|monthly|all] [limit]";

    let mut period = LeaderboardPeriod::default();
    let mut limit = DEFAULT_LEADERBOARD_LIMIT;
    for arg in args {
        if let Ok(value) = arg.parse::<u32>() {
            limit = value;
        } else {
            period = LeaderboardPeriod::try_from(*arg).map_err(|_| CommandError::Usage(USAGE))?;
        }
    }
    Ok(PlayerCommand::Leaderboard { period, limit })
}

/// `create <name...> [max-players] [rounds] [private]`
fn parse_create(args: &[&str]) -> Result<NewRoom, CommandError> {
    const USAGE: &str = "create <name> [max-players] [rounds] [private]";

    let mut args = args.to_vec();
    let is_private = args
        .last()
        .is_some_and(|last| last.eq_ignore_ascii_case("private"));
    if is_private {
        args.pop();
    }

    let name_len = args
        .iter()
        .position(|arg| arg.parse::<u32>().is_ok())
        .unwrap_or(args.len());
    if name_len == 0 {
        return Err(CommandError::Usage(USAGE));
    }
    let (name, numbers) = args.split_at(name_len);

    let numbers = numbers
        .iter()
        .map(|n| n.parse::<u32>().map_err(|_| CommandError::Usage(USAGE)))
        .collect::<Result<Vec<u32>, CommandError>>()?;
    let (max_players, total_rounds) = match numbers.as_slice() {
        [] => (DEFAULT_MAX_PLAYERS, DEFAULT_TOTAL_ROUNDS),
        [max] => (*max, DEFAULT_TOTAL_ROUNDS),
        [max, rounds] => (*max, *rounds),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    Ok(NewRoom {
        name: name.join(" "),
        max_players,
        total_rounds,
        is_private,
        nickname: None,
    })
}

fn parse_player_id(args: &[&str], usage: &'static str) -> Result<i64, CommandError> {
    match args {
        [id] => id
            .parse::<i64>()
            .map_err(|_| CommandError::Invalid(format!("'{}' is not a player id", id))),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_game_id(args: &[&str], usage: &'static str) -> Result<RoomId, CommandError> {
    match args {
        [id] => RoomId::parse(id).map_err(|e| CommandError::Invalid(e.to_string())),
        _ => Err(CommandError::Usage(usage)),
    }
}
