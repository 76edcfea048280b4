use std::cmp::Ordering;
use std::collections::HashMap;

use types::{Game, Player, PlayerGameSummary, PlayerId, PlayerName, RoundStatus};

use crate::settle::settle;

pub(crate) fn roster_index(players: &[Player]) -> HashMap<&PlayerId, &Player> {
    players.iter().map(|p| (&p.id, p)).collect()
}

/// Per-participant results for `game`, highest total first.
///
/// Names are resolved against the current roster, so ids that were removed
/// since the game was played show up as [`PlayerName::Unknown`]. Ties keep the
/// game's participant order.
pub fn summarize(game: &Game, players: &[Player]) -> Vec<PlayerGameSummary> {
    let roster = roster_index(players);

    let mut summaries: Vec<PlayerGameSummary> = game
        .players
        .iter()
        .map(|player_id| {
            let player_name = PlayerName::resolve(roster.get(player_id).copied());
            if player_name.is_unknown() {
                log::debug!("Player {player_id} of game {} is not in the roster", game.id);
            }

            let mut total_net = 0.0;
            let mut round_details = Vec::with_capacity(game.rounds.len());
            let (mut wins, mut losses) = (0, 0);
            for round in &game.rounds {
                let net = settle(round, player_id);
                total_net += net;
                round_details.push(net);

                match round.status_of(player_id) {
                    Some(RoundStatus::Win) => wins += 1,
                    Some(RoundStatus::Lose) => losses += 1,
                    None => {}
                }
            }

            PlayerGameSummary {
                player_id: player_id.clone(),
                player_name,
                total_net,
                round_details,
                wins,
                losses,
            }
        })
        .collect();

    // stable, so equal totals stay in participant order
    summaries.sort_by(|a, b| {
        b.total_net
            .partial_cmp(&a.total_net)
            .unwrap_or(Ordering::Equal)
    });
    summaries
}
