use std::fmt::Display;

use itertools::Itertools;

use crate::{PlayerId, PlayerName};

/// Nets smaller than this are treated as break-even when telling players
/// whether they pay or receive.
pub const BREAK_EVEN_EPSILON: f64 = 0.01;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Receives,
    Pays,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Receives => write!(f, "receives"),
            Direction::Pays => write!(f, "pays"),
        }
    }
}

/// One participant's result for a whole game. Derived from a game and the
/// current roster on every read; never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerGameSummary {
    pub player_id: PlayerId,
    pub player_name: PlayerName,
    pub total_net: f64,
    /// Net per round, in round order.
    pub round_details: Vec<f64>,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerGameSummary {
    /// The resolved name, or `Unknown (<id>)` so players missing from the
    /// roster can still be told apart.
    pub fn label(&self) -> String {
        match &self.player_name {
            PlayerName::Resolved(name) => name.clone(),
            PlayerName::Unknown => format!("{} ({})", self.player_name, self.player_id),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        if self.total_net.abs() < BREAK_EVEN_EPSILON {
            None
        } else if self.total_net > 0.0 {
            Some(Direction::Receives)
        } else {
            Some(Direction::Pays)
        }
    }
}

impl Display for PlayerGameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:+.2} [{}] ({}W/{}L)",
            self.label(),
            self.total_net,
            self.round_details
                .iter()
                .map(|net| format!("{net:+.2}"))
                .join(", "),
            self.wins,
            self.losses
        )
    }
}
