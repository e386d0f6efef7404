//! Client-side preconditions checked before an action is dispatched.
//!
//! A failed check never reaches the network.

use crate::domain::{MIN_PLAYERS_TO_START, NewRoom, PlayerId, Registration};

use super::error::ActionError;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_NICKNAME_LENGTH: usize = 50;
pub const ROOM_CODE_LENGTH: usize = 6;

pub fn validate_credentials(username: &str, password: &str) -> Result<(), ActionError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ActionError::validation(
            "Username and password are required",
        ));
    }
    Ok(())
}

pub fn validate_registration(registration: &Registration) -> Result<(), ActionError> {
    if registration.username.trim().is_empty()
        || registration.email.trim().is_empty()
        || registration.password.is_empty()
    {
        return Err(ActionError::validation("All fields are required"));
    }
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ActionError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if registration.password != registration.password_confirm {
        return Err(ActionError::validation("Passwords do not match"));
    }
    Ok(())
}

/// Trimmed nickname.
pub fn validate_nickname(nickname: &str) -> Result<String, ActionError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(ActionError::validation("Nickname is required"));
    }
    if nickname.chars().count() > MAX_NICKNAME_LENGTH {
        return Err(ActionError::validation(format!(
            "Nickname must be at most {} characters",
            MAX_NICKNAME_LENGTH
        )));
    }
    Ok(nickname.to_string())
}

/// Upper-cased room code.
pub fn normalize_room_code(code: &str) -> Result<String, ActionError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ActionError::validation("Room code is required"));
    }
    if code.chars().count() > ROOM_CODE_LENGTH {
        return Err(ActionError::validation(format!(
            "Room code must be at most {} characters",
            ROOM_CODE_LENGTH
        )));
    }
    Ok(code.to_uppercase())
}

pub fn validate_new_room(room: &NewRoom) -> Result<(), ActionError> {
    if room.name.trim().is_empty() {
        return Err(ActionError::validation("Room name is required"));
    }
    if (room.max_players as usize) < MIN_PLAYERS_TO_START {
        return Err(ActionError::validation(format!(
            "A room needs room for at least {} players",
            MIN_PLAYERS_TO_START
        )));
    }
    if room.total_rounds == 0 {
        return Err(ActionError::validation("A game needs at least one round"));
    }
    Ok(())
}

/// Parses a numeric answer. Only positive whole numbers are accepted.
pub fn parse_answer(input: &str) -> Result<i64, ActionError> {
    match input.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ActionError::validation(
            "Answer must be a positive whole number",
        )),
    }
}

/// A vote needs exactly one selection, and it cannot be the voter.
pub fn validate_vote(
    selection: &[PlayerId],
    self_id: Option<PlayerId>,
) -> Result<PlayerId, ActionError> {
    let [accused] = selection else {
        return Err(ActionError::validation("Select exactly one player"));
    };
    if Some(*accused) == self_id {
        return Err(ActionError::validation("You cannot vote for yourself"));
    }
    Ok(*accused)
}

pub fn validate_start(player_count: usize) -> Result<(), ActionError> {
    if player_count < MIN_PLAYERS_TO_START {
        return Err(ActionError::validation(format!(
            "Need at least {} players to start ({} joined)",
            MIN_PLAYERS_TO_START, player_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> Registration {
        Registration {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_parse_answer() {
        // テスト項目: 正の整数のみが回答として受け付けられる
        // given (前提条件):
        let inputs = [" 42 ", "0", "-3", "4.5", "abc", ""];

        // when (操作):
        let results: Vec<Option<i64>> = inputs.iter().map(|s| parse_answer(s).ok()).collect();

        // then (期待する結果):
        assert_eq!(results, vec![Some(42), None, None, None, None, None]);
    }

    #[test]
    fn test_validate_vote() {
        // テスト項目: 投票は一人だけを選び、自分自身は選べない
        // given (前提条件):
        let me = Some(PlayerId(1));

        // when (操作):
        let none = validate_vote(&[], me);
        let two = validate_vote(&[PlayerId(2), PlayerId(3)], me);
        let myself = validate_vote(&[PlayerId(1)], me);
        let other = validate_vote(&[PlayerId(2)], me);

        // then (期待する結果):
        assert!(none.is_err());
        assert!(two.is_err());
        assert!(myself.is_err());
        assert_eq!(other.unwrap(), PlayerId(2));
    }

    #[test]
    fn test_validate_start_needs_three_players() {
        // テスト項目: 3 人未満ではゲームを開始できない
        // given (前提条件):
        let counts = [0, 2, 3, 8];

        // when (操作):
        let results: Vec<bool> = counts.iter().map(|c| validate_start(*c).is_ok()).collect();

        // then (期待する結果):
        assert_eq!(results, vec![false, false, true, true]);
    }

    #[test]
    fn test_validate_registration() {
        // テスト項目: パスワードは 6 文字以上かつ確認用と一致する必要がある
        // given (前提条件):
        let short = registration("abc", "abc");
        let mismatch = registration("secret1", "secret2");
        let ok = registration("secret1", "secret1");

        // when (操作):
        let short = validate_registration(&short);
        let mismatch = validate_registration(&mismatch);
        let ok = validate_registration(&ok);

        // then (期待する結果):
        assert!(matches!(short, Err(ActionError::Validation(m)) if m.contains("6")));
        assert!(matches!(mismatch, Err(ActionError::Validation(m)) if m.contains("match")));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_normalize_room_code() {
        // テスト項目: ルームコードは大文字化され、空は拒否される
        // given (前提条件):
        let inputs = [" ab12cd ", "", "TOOLONG1"];

        // when (操作):
        let results: Vec<Option<String>> = inputs
            .iter()
            .map(|s| normalize_room_code(s).ok())
            .collect();

        // then (期待する結果):
        assert_eq!(results, vec![Some("AB12CD".to_string()), None, None]);
    }

    #[test]
    fn test_validate_nickname_and_credentials() {
        // テスト項目: 空のニックネームや認証情報は拒否される
        // given (前提条件):
        let blank = "   ";

        // when (操作):
        let nickname = validate_nickname(blank);
        let trimmed = validate_nickname("  bob ");
        let credentials = validate_credentials("alice", "");

        // then (期待する結果):
        assert!(nickname.is_err());
        assert_eq!(trimmed.unwrap(), "bob");
        assert!(credentials.is_err());
    }

    #[test]
    fn test_validate_new_room() {
        // テスト項目: ルーム名が必要で、最大人数は 3 人以上、ラウンド数は 1 以上
        // given (前提条件):
        let base = NewRoom {
            name: "Friday".to_string(),
            max_players: 8,
            total_rounds: 5,
            is_private: false,
            nickname: None,
        };

        // when (操作):
        let ok = validate_new_room(&base);
        let unnamed = validate_new_room(&NewRoom {
            name: " ".to_string(),
            ..base.clone()
        });
        let tiny = validate_new_room(&NewRoom {
            max_players: 2,
            ..base.clone()
        });
        let no_rounds = validate_new_room(&NewRoom {
            total_rounds: 0,
            ..base
        });

        // then (期待する結果):
        assert!(ok.is_ok());
        assert!(unnamed.is_err());
        assert!(tiny.is_err());
        assert!(no_rounds.is_err());
    }
}
