use std::borrow::Borrow;

use thiserror::Error;
use types::{RoundResult, RoundStatus};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundValidationError {
    #[error("at least one player must win.")]
    NoWinners,

    #[error("at least one player must lose (who pays?).")]
    NoLosers,
}

/// Structured view of a validation outcome, for front ends that gate a step
/// on `is_valid` and show `error` next to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl From<Result<(), RoundValidationError>> for RoundValidation {
    fn from(result: Result<(), RoundValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                error: None,
            },
            Err(err) => Self {
                is_valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// A round can be settled only with at least one winner and one loser.
/// Winners are checked first, so an empty round reports `NoWinners`.
pub fn validate_round<I>(statuses: I) -> Result<(), RoundValidationError>
where
    I: IntoIterator,
    I::Item: Borrow<RoundStatus>,
{
    let (mut winners, mut losers) = (0usize, 0usize);
    for status in statuses {
        match status.borrow() {
            RoundStatus::Win => winners += 1,
            RoundStatus::Lose => losers += 1,
        }
    }

    if winners == 0 {
        return Err(RoundValidationError::NoWinners);
    }
    if losers == 0 {
        return Err(RoundValidationError::NoLosers);
    }
    Ok(())
}

pub fn validate_results(results: &[RoundResult]) -> Result<(), RoundValidationError> {
    validate_round(results.iter().map(|r| r.status))
}
