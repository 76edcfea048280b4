use serde::{de::DeserializeOwned, Serialize};
use types::Game;

use crate::DatabaseError;

pub const PLAYERS_KEY: &str = "golf_ledger_players";
pub const GAMES_KEY: &str = "golf_ledger_games";

/// Each key holds one JSON array; a missing key reads as an empty collection.
pub fn decode_collection<T: DeserializeOwned>(raw: Option<&str>) -> Result<Vec<T>, DatabaseError> {
    match raw {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(Vec::new()),
    }
}

pub fn encode_collection<T: Serialize>(items: &[T]) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(items)?)
}

/// Degenerate rounds are stored as given; settlement nets them to zero.
pub(crate) fn warn_degenerate_rounds(game: &Game) {
    for round in game.rounds.iter().filter(|r| r.is_degenerate()) {
        tracing::warn!(
            game_id = %game.id,
            round = round.number,
            "Storing round without a winner or without a loser; it will settle to zero"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Player;

    #[test]
    fn test_missing_key_is_empty() {
        let players: Vec<Player> = decode_collection(None).unwrap();
        assert!(players.is_empty());
    }

    #[test]
    fn test_collection_round_trip_keeps_order() {
        let players = vec![
            Player::new_with_id("2".into(), "Rory McIlroy", Some("Rors")),
            Player::new_with_id("1".into(), "Tiger Woods", None),
        ];
        let json = encode_collection(&players).unwrap();
        let decoded: Vec<Player> = decode_collection(Some(&json)).unwrap();
        let ids: Vec<_> = decoded.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(decoded[0].nickname.as_deref(), Some("Rors"));
    }

    #[test]
    fn test_corrupt_json_is_a_serialization_error() {
        let result: Result<Vec<Player>, _> = decode_collection(Some("{not json"));
        assert!(matches!(result, Err(DatabaseError::Serialization(_))));
    }
}
