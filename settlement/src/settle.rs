use types::{PlayerId, Round, RoundStatus};

use crate::validate::{validate_results, RoundValidationError};

/// Net amount `player_id` receives (positive) or pays (negative) for one round.
///
/// Every loser pays exactly one stake and the pot is split evenly among the
/// winners; the share is returned at full precision. A player without a result
/// in the round did not play it and nets zero. A round with no winner or no
/// loser nets zero for everybody; callers should have rejected it with
/// [`validate_round`](crate::validate_round) first.
pub fn settle(round: &Round, player_id: &PlayerId) -> f64 {
    let Some(result) = round.result_for(player_id) else {
        return 0.0;
    };

    let losers = round.losers();
    let winners = round.winners();
    if winners == 0 || losers == 0 {
        log::debug!(
            "Round {} cannot be settled ({winners} winners, {losers} losers), netting zero",
            round.number
        );
        return 0.0;
    }

    let pot = losers as f64 * round.stake;
    match result.status {
        RoundStatus::Lose => -round.stake,
        RoundStatus::Win => pot / winners as f64,
    }
}

/// Like [`settle`], but refuses degenerate rounds instead of netting zero.
pub fn settle_checked(round: &Round, player_id: &PlayerId) -> Result<f64, RoundValidationError> {
    validate_results(&round.results)?;
    Ok(settle(round, player_id))
}

/// Total collected from the losers of a round.
pub fn pot(round: &Round) -> f64 {
    if round.is_degenerate() {
        return 0.0;
    }
    round.losers() as f64 * round.stake
}
