//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    api::Reconnection,
    entity::{
        ContinueOutcome, LeaderboardEntry, Player, RevealedAnswer, Room, Round, RoundAnswer,
        RoundResults, RoundStatus, RoundVote, Session, User, UserRooms,
    },
    error::ApiError,
    value_object::{AuthToken, PlayerId, UserId},
};
use crate::infrastructure::dto::http as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::UserDto> for User {
    fn from(dto: dto::UserDto) -> Self {
        Self {
            id: UserId(dto.id),
            username: dto.username,
            email: dto.email.unwrap_or_default(),
            is_staff: dto.is_staff,
            is_superuser: dto.is_superuser,
        }
    }
}

impl From<dto::ProfileDto> for User {
    fn from(dto: dto::ProfileDto) -> Self {
        match dto {
            dto::ProfileDto::Wrapped { user } | dto::ProfileDto::Flat(user) => user.into(),
        }
    }
}

impl TryFrom<dto::AuthResponseDto> for Session {
    type Error = ApiError;

    fn try_from(dto: dto::AuthResponseDto) -> Result<Self, Self::Error> {
        let token = AuthToken::new(dto.token).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(Self {
            token,
            user: dto.user.into(),
        })
    }
}

impl From<dto::PlayerDto> for Player {
    fn from(dto: dto::PlayerDto) -> Self {
        let user_id = dto
            .user
            .as_ref()
            .map(dto::UserRefDto::id)
            .or(dto.user_id)
            .map(UserId);
        Self {
            id: PlayerId(dto.id),
            user_id,
            nickname: dto.nickname,
            score: dto.score,
            is_connected: dto.is_connected,
            is_host: dto.is_host,
        }
    }
}

impl From<dto::RoomDto> for Room {
    fn from(dto: dto::RoomDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            status: dto.status,
            host_id: dto.host.as_ref().map(|h| UserId(h.id())),
            players: dto.players.into_iter().map(Player::from).collect(),
            max_players: dto.max_players,
            total_rounds: dto.total_rounds,
            current_round: dto.current_round,
            is_private: dto.is_private,
            room_code: dto.room_code,
            current_user_player: dto.current_user_player.map(Player::from),
        }
    }
}

impl From<dto::UserRoomsDto> for UserRooms {
    fn from(dto: dto::UserRoomsDto) -> Self {
        Self {
            current_room: dto.current_room.map(Room::from),
            recent_games: dto.recent_games.into_iter().map(Room::from).collect(),
        }
    }
}

impl From<dto::ReconnectionDto> for Option<Reconnection> {
    fn from(dto: dto::ReconnectionDto) -> Self {
        if !dto.can_reconnect {
            return None;
        }
        dto.room.map(|room| Reconnection {
            room_id: room.id,
            room_name: room.name,
            room_status: room.status.label().to_string(),
        })
    }
}

impl From<dto::RoundDto> for Round {
    fn from(dto: dto::RoundDto) -> Self {
        let question_text = dto.player_question.or(dto.question).map(|q| q.text);
        Self {
            number: dto.round_number,
            status: RoundStatus::from(dto.status.as_deref().unwrap_or_default()),
            question_text,
            answers: dto
                .answers
                .into_iter()
                .map(|a| RoundAnswer {
                    player_id: PlayerId(a.player.id),
                    nickname: a.player.nickname,
                    value: a.answer,
                })
                .collect(),
            votes: dto
                .votes
                .into_iter()
                .map(|v| RoundVote {
                    voter_id: PlayerId(v.voter.id),
                    accused_id: PlayerId(v.accused.id),
                })
                .collect(),
            user_has_answered: dto.user_has_answered,
            user_has_voted: dto.user_has_voted,
        }
    }
}

impl From<dto::RoundResultsDto> for RoundResults {
    fn from(dto: dto::RoundResultsDto) -> Self {
        let mut answers: Vec<RevealedAnswer> = dto
            .answers_with_players
            .into_iter()
            .map(|a| RevealedAnswer {
                player_id: PlayerId(a.player_id),
                nickname: a.player_nickname,
                value: a.answer,
                is_imposter: a.is_imposter,
            })
            .collect();
        answers.sort_by_key(|a| a.value);

        let mut scores: Vec<(String, i64)> = dto.current_scores.into_iter().collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            round_number: dto.round_number,
            question_text: dto.question_text,
            decoy_question_text: dto.decoy_question_text,
            answers,
            imposter_nickname: dto.results.imposter_nickname,
            imposter_caught: dto.results.imposter_caught,
            most_voted_nickname: dto.results.most_voted_player_nickname,
            total_votes: dto.results.total_votes,
            scores,
        }
    }
}

impl TryFrom<dto::ContinueDto> for ContinueOutcome {
    type Error = ApiError;

    fn try_from(dto: dto::ContinueDto) -> Result<Self, Self::Error> {
        match (dto.next_round, dto.game_ended) {
            (Some(round), _) => Ok(ContinueOutcome::NextRound(round)),
            (None, true) => Ok(ContinueOutcome::GameEnded),
            (None, false) => Err(ApiError::Parse(
                "continue response has neither next_round nor game_ended".to_string(),
            )),
        }
    }
}

impl From<dto::LeaderboardDto> for LeaderboardEntry {
    fn from(dto: dto::LeaderboardDto) -> Self {
        Self {
            rank: dto.rank,
            username: dto.user.username,
            total_score: dto.total_score,
            total_games: dto.total_games,
            total_wins: dto.total_wins,
            win_rate: dto.win_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entity::RoomStatus, phase::SubPanel};

    const ROOM_WITH_NESTED_HOST: &str = r#"{
        "id": "6f1c2a8e-3d4b-4c5a-9e7f-0a1b2c3d4e5f",
        "name": "Friday",
        "host": {"id": 1, "username": "alice", "email": "a@example.com"},
        "status": "waiting",
        "max_players": 8,
        "current_round": 0,
        "total_rounds": 5,
        "is_private": true,
        "room_code": "ABC123",
        "players": [
            {"id": 10, "user": {"id": 1, "username": "alice"}, "nickname": "ali", "score": 0, "is_connected": true},
            {"id": 11, "user": {"id": 2, "username": "bob"}, "nickname": "bobby", "score": 3, "is_connected": false}
        ],
        "player_count": 2,
        "current_user_player": null
    }"#;

    #[test]
    fn test_room_with_nested_host_to_domain() {
        // テスト項目: ネストしたユーザーとしての host がホスト id に変換される
        // given (前提条件):
        let dto: dto::RoomDto = serde_json::from_str(ROOM_WITH_NESTED_HOST).unwrap();

        // when (操作):
        let room: Room = dto.into();

        // then (期待する結果):
        assert_eq!(room.host_id, Some(UserId(1)));
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.players.len(), 2);
        assert_eq!(room.players[1].user_id, Some(UserId(2)));
        assert!(!room.players[1].is_connected);
        assert!(!room.players[0].is_host);
        assert_eq!(room.room_code.as_deref(), Some("ABC123"));
        assert!(room.current_user_player.is_none());
    }

    #[test]
    fn test_room_with_bare_host_id_to_domain() {
        // テスト項目: 数値のみの host と user_id / is_host を持つプレイヤーが変換される
        // given (前提条件):
        let json = r#"{
            "id": "6f1c2a8e-3d4b-4c5a-9e7f-0a1b2c3d4e5f",
            "name": "Bare",
            "host": 7,
            "status": "in_progress",
            "max_players": 4,
            "total_rounds": 3,
            "players": [{"id": 70, "user_id": 7, "nickname": "h", "is_host": true}]
        }"#;
        let dto: dto::RoomDto = serde_json::from_str(json).unwrap();

        // when (操作):
        let room: Room = dto.into();

        // then (期待する結果):
        assert_eq!(room.host_id, Some(UserId(7)));
        assert_eq!(room.players[0].user_id, Some(UserId(7)));
        assert!(room.players[0].is_host);
        assert!(room.players[0].is_connected);
        assert_eq!(room.current_round, 0);
    }

    #[test]
    fn test_room_with_unknown_status_fails_to_parse() {
        // テスト項目: 未知のルームステータスはパースエラーになる
        // given (前提条件):
        let json = r#"{
            "id": "6f1c2a8e-3d4b-4c5a-9e7f-0a1b2c3d4e5f",
            "name": "Odd",
            "status": "archived",
            "max_players": 4,
            "total_rounds": 3
        }"#;

        // when (操作):
        let result = serde_json::from_str::<dto::RoomDto>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_wrapped_and_flat() {
        // テスト項目: プロフィールは user エンベロープ付きでもフラットでも User に変換される
        // given (前提条件):
        let wrapped = r#"{"user": {"id": 3, "username": "carol", "is_staff": true}, "recent_games": []}"#;
        let flat = r#"{"id": 4, "username": "dave", "email": "d@example.com"}"#;

        // when (操作):
        let wrapped: User = serde_json::from_str::<dto::ProfileDto>(wrapped)
            .unwrap()
            .into();
        let flat: User = serde_json::from_str::<dto::ProfileDto>(flat).unwrap().into();

        // then (期待する結果):
        assert_eq!(wrapped.id, UserId(3));
        assert!(wrapped.is_staff);
        assert_eq!(flat.username, "dave");
        assert_eq!(flat.email, "d@example.com");
        assert!(!flat.has_admin_access());
    }

    #[test]
    fn test_round_prefers_player_question() {
        // テスト項目: player_question があれば question より優先される
        // given (前提条件):
        let json = r#"{
            "round_number": 2,
            "status": "discussion",
            "question": {"text": "real"},
            "player_question": {"text": "decoy"},
            "answers": [
                {"id": 1, "player": {"id": 10, "nickname": "a"}, "answer": 9},
                {"id": 2, "player": {"id": 11, "nickname": "b"}, "answer": 4}
            ],
            "votes": [{"id": 5, "voter": {"id": 10, "nickname": "a"}, "accused": {"id": 11, "nickname": "b"}}],
            "user_has_answered": true
        }"#;
        let dto: dto::RoundDto = serde_json::from_str(json).unwrap();

        // when (操作):
        let round: Round = dto.into();

        // then (期待する結果):
        assert_eq!(round.number, 2);
        assert_eq!(round.status, RoundStatus::Discussion);
        assert_eq!(round.question_text.as_deref(), Some("decoy"));
        assert_eq!(round.answers.len(), 2);
        assert_eq!(round.votes[0].accused_id, PlayerId(11));
        assert!(round.user_has_answered);
        assert!(!round.user_has_voted);
    }

    #[test]
    fn test_round_without_status_is_unknown() {
        // テスト項目: status が欠落または null のラウンドもエラーにならず不明な状態になる
        // given (前提条件):
        let missing = r#"{"round_number": 1, "answers": []}"#;
        let null = r#"{"round_number": 1, "status": null, "answers": []}"#;

        // when (操作):
        let missing: Round = serde_json::from_str::<dto::RoundDto>(missing).unwrap().into();
        let null: Round = serde_json::from_str::<dto::RoundDto>(null).unwrap().into();

        // then (期待する結果):
        assert_eq!(missing.status, RoundStatus::Unknown(String::new()));
        assert_eq!(null.status, RoundStatus::Unknown(String::new()));
        assert_eq!(SubPanel::from_round_status(&missing.status), None);
    }

    #[test]
    fn test_round_results_sorted() {
        // テスト項目: 結果の回答は昇順、スコアは降順（同点は名前順）に並ぶ
        // given (前提条件):
        let json = r#"{
            "round_number": 1,
            "question_text": "How many?",
            "decoy_question_text": "How few?",
            "answers_with_players": [
                {"player_id": 1, "player_nickname": "a", "answer": 30, "is_imposter": true},
                {"player_id": 2, "player_nickname": "b", "answer": 5, "is_imposter": false}
            ],
            "results": {"imposter_nickname": "a", "imposter_caught": true, "most_voted_player_nickname": "a", "total_votes": 2, "vote_counts": {"1": 2}},
            "current_scores": {"b": 2, "a": 0, "c": 2}
        }"#;
        let dto: dto::RoundResultsDto = serde_json::from_str(json).unwrap();

        // when (操作):
        let results: RoundResults = dto.into();

        // then (期待する結果):
        let values: Vec<i64> = results.answers.iter().map(|a| a.value).collect();
        assert_eq!(values, vec![5, 30]);
        assert_eq!(
            results.scores,
            vec![
                ("b".to_string(), 2),
                ("c".to_string(), 2),
                ("a".to_string(), 0)
            ]
        );
        assert!(results.imposter_caught);
        assert_eq!(results.total_votes, 2);
    }

    #[test]
    fn test_continue_outcome() {
        // テスト項目: continue のレスポンスが次ラウンドまたはゲーム終了に変換される
        // given (前提条件):
        let next = dto::ContinueDto {
            game_ended: false,
            next_round: Some(3),
        };
        let ended = dto::ContinueDto {
            game_ended: true,
            next_round: None,
        };
        let neither = dto::ContinueDto {
            game_ended: false,
            next_round: None,
        };

        // when (操作):
        let next = ContinueOutcome::try_from(next);
        let ended = ContinueOutcome::try_from(ended);
        let neither = ContinueOutcome::try_from(neither);

        // then (期待する結果):
        assert_eq!(next, Ok(ContinueOutcome::NextRound(3)));
        assert_eq!(ended, Ok(ContinueOutcome::GameEnded));
        assert!(matches!(neither, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_reconnection_only_when_possible() {
        // テスト項目: can_reconnect が false なら再接続先はない
        // given (前提条件):
        let none = r#"{"can_reconnect": false}"#;
        let some = format!(r#"{{"can_reconnect": true, "room": {}}}"#, ROOM_WITH_NESTED_HOST);

        // when (操作):
        let none: Option<Reconnection> = serde_json::from_str::<dto::ReconnectionDto>(none)
            .unwrap()
            .into();
        let some: Option<Reconnection> = serde_json::from_str::<dto::ReconnectionDto>(&some)
            .unwrap()
            .into();

        // then (期待する結果):
        assert!(none.is_none());
        assert_eq!(some.map(|r| r.room_name), Some("Friday".to_string()));
    }

    #[test]
    fn test_auth_response_with_blank_token_is_rejected() {
        // テスト項目: 空のトークンを含む認証レスポンスはパースエラーになる
        // given (前提条件):
        let dto = dto::AuthResponseDto {
            token: " ".to_string(),
            user: dto::UserDto {
                id: 1,
                username: "a".to_string(),
                email: None,
                is_staff: false,
                is_superuser: false,
            },
        };

        // when (操作):
        let result = Session::try_from(dto);

        // then (期待する結果):
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
