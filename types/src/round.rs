use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::PlayerId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundStatus {
    Win,
    Lose,
}

impl Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundStatus::Win => write!(f, "WIN"),
            RoundStatus::Lose => write!(f, "LOSE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub player_id: PlayerId,
    pub status: RoundStatus,
}

impl RoundResult {
    pub fn new(player_id: impl Into<PlayerId>, status: RoundStatus) -> Self {
        Self {
            player_id: player_id.into(),
            status,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position within the game.
    pub number: u32,
    pub stake: f64,
    pub results: Vec<RoundResult>,
}

impl Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Round {} (stake {}): {}",
            self.number,
            self.stake,
            self.results
                .iter()
                .map(|r| format!("{}={}", r.player_id, r.status))
                .join(", ")
        )
    }
}

impl Round {
    pub fn new(number: u32, stake: f64, results: Vec<RoundResult>) -> Self {
        Self {
            number,
            stake,
            results,
        }
    }

    pub fn result_for(&self, player_id: &PlayerId) -> Option<&RoundResult> {
        self.results.iter().find(|r| &r.player_id == player_id)
    }

    pub fn status_of(&self, player_id: &PlayerId) -> Option<RoundStatus> {
        self.result_for(player_id).map(|r| r.status)
    }

    pub fn count(&self, status: RoundStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn winners(&self) -> usize {
        self.count(RoundStatus::Win)
    }

    pub fn losers(&self) -> usize {
        self.count(RoundStatus::Lose)
    }

    /// True when everybody shares one status, leaving no pot or nobody to fund it.
    pub fn is_degenerate(&self) -> bool {
        self.winners() == 0 || self.losers() == 0
    }
}
