use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{PlayerId, Round, StakeSchedule};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("A game needs at least two players, got {0}")]
    NotEnoughPlayers(usize),

    #[error("Player {0} is listed more than once")]
    DuplicatePlayer(PlayerId),

    #[error("Expected {expected} rounds, got {actual}")]
    RoundCount { expected: usize, actual: usize },

    #[error("Round at position {position} is numbered {number}")]
    RoundNumber { position: usize, number: u32 },

    #[error("Round {round} has stake {actual}, schedule says {expected}")]
    StakeMismatch {
        round: u32,
        expected: f64,
        actual: f64,
    },

    #[error("Round {round} has no result for player {player_id}")]
    MissingResult { round: u32, player_id: PlayerId },

    #[error("Round {round} has more than one result for player {player_id}")]
    DuplicateResult { round: u32, player_id: PlayerId },

    #[error("Round {round} has a result for non-participant {player_id}")]
    UnknownParticipant { round: u32, player_id: PlayerId },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    pub played_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub players: Vec<PlayerId>,
    pub rounds: Vec<Round>,
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Game {
    pub fn is_participant(&self, player_id: &PlayerId) -> bool {
        self.players.contains(player_id)
    }

    /// Checks the structural rules a game must satisfy before it is stored.
    /// Degenerate rounds (no winner or no loser) are not rejected here.
    pub fn check_invariants(&self, schedule: &StakeSchedule) -> Result<(), GameError> {
        if self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers(self.players.len()));
        }
        let mut seen = HashSet::with_capacity(self.players.len());
        for player_id in &self.players {
            if !seen.insert(player_id) {
                return Err(GameError::DuplicatePlayer(player_id.clone()));
            }
        }

        if self.rounds.len() != schedule.rounds() {
            return Err(GameError::RoundCount {
                expected: schedule.rounds(),
                actual: self.rounds.len(),
            });
        }

        for (position, round) in self.rounds.iter().enumerate() {
            if round.number as usize != position + 1 {
                return Err(GameError::RoundNumber {
                    position: position + 1,
                    number: round.number,
                });
            }
            let expected = schedule.stake_for(round.number).unwrap_or_default();
            if round.stake != expected {
                return Err(GameError::StakeMismatch {
                    round: round.number,
                    expected,
                    actual: round.stake,
                });
            }

            let mut answered = HashSet::with_capacity(round.results.len());
            for result in &round.results {
                if !seen.contains(&result.player_id) {
                    return Err(GameError::UnknownParticipant {
                        round: round.number,
                        player_id: result.player_id.clone(),
                    });
                }
                if !answered.insert(&result.player_id) {
                    return Err(GameError::DuplicateResult {
                        round: round.number,
                        player_id: result.player_id.clone(),
                    });
                }
            }
            if let Some(missing) = self.players.iter().find(|p| !answered.contains(p)) {
                return Err(GameError::MissingResult {
                    round: round.number,
                    player_id: missing.clone(),
                });
            }
            if round.is_degenerate() {
                log::debug!("Game {} round {} has no winner or no loser", self.id, round.number);
            }
        }
        Ok(())
    }
}
