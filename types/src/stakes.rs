use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STAKES: [f64; 3] = [15.0, 15.0, 20.0];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StakeScheduleError {
    #[error("Stake schedule must contain at least one round")]
    Empty,

    #[error("Stake for round {round} must be a positive amount, got {stake}")]
    NonPositive { round: u32, stake: f64 },
}

/// Stake owed by each loser, one entry per round position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct StakeSchedule {
    stakes: Vec<f64>,
}

impl StakeSchedule {
    pub fn new(stakes: Vec<f64>) -> Result<Self, StakeScheduleError> {
        if stakes.is_empty() {
            return Err(StakeScheduleError::Empty);
        }
        if let Some((idx, &stake)) = stakes
            .iter()
            .enumerate()
            .find(|&(_, &stake)| !stake.is_finite() || stake <= 0.0)
        {
            return Err(StakeScheduleError::NonPositive {
                round: idx as u32 + 1,
                stake,
            });
        }
        Ok(Self { stakes })
    }

    pub fn rounds(&self) -> usize {
        self.stakes.len()
    }

    /// Stake for a 1-based round number.
    pub fn stake_for(&self, round_number: u32) -> Option<f64> {
        let idx = (round_number as usize).checked_sub(1)?;
        self.stakes.get(idx).copied()
    }

    pub fn stakes(&self) -> &[f64] {
        &self.stakes
    }
}

impl Default for StakeSchedule {
    fn default() -> Self {
        Self {
            stakes: DEFAULT_STAKES.to_vec(),
        }
    }
}

impl TryFrom<Vec<f64>> for StakeSchedule {
    type Error = StakeScheduleError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StakeSchedule> for Vec<f64> {
    fn from(value: StakeSchedule) -> Self {
        value.stakes
    }
}
