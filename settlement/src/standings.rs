use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use types::{Game, Player, PlayerId, PlayerName};

use crate::summary::{roster_index, summarize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Period {
    All,
    Month { year: i32, month: u32 },
}

impl Period {
    /// The local calendar month `at` falls in.
    pub fn month_of(at: DateTime<Utc>) -> Self {
        let local = at.with_timezone(&Local);
        Period::Month {
            year: local.year(),
            month: local.month(),
        }
    }

    /// Whether `at` falls in the period, by the local calendar.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.contains_in(at, &Local)
    }

    pub fn contains_in<Tz: TimeZone>(&self, at: DateTime<Utc>, tz: &Tz) -> bool {
        match *self {
            Period::All => true,
            Period::Month { year, month } => {
                let local = at.with_timezone(tz);
                local.year() == year && local.month() == month
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: PlayerName,
    pub net: f64,
    pub games_played: u32,
}

impl Standing {
    /// Same as [`PlayerGameSummary::label`](types::PlayerGameSummary::label).
    pub fn label(&self) -> String {
        match &self.player_name {
            PlayerName::Resolved(name) => name.clone(),
            PlayerName::Unknown => format!("{} ({})", self.player_name, self.player_id),
        }
    }
}

/// Net result per player over every game played within `period`, highest
/// first. Players tied on net keep the order in which they first appear.
pub fn standings(games: &[Game], players: &[Player], period: Period) -> Vec<Standing> {
    let roster = roster_index(players);
    let mut order: Vec<PlayerId> = Vec::new();
    let mut totals: HashMap<PlayerId, (f64, u32)> = HashMap::new();

    for game in games.iter().filter(|g| period.contains(g.played_at)) {
        for summary in summarize(game, players) {
            let entry = totals.entry(summary.player_id.clone()).or_insert_with(|| {
                order.push(summary.player_id.clone());
                (0.0, 0)
            });
            entry.0 += summary.total_net;
            entry.1 += 1;
        }
    }

    let mut standings: Vec<Standing> = order
        .into_iter()
        .map(|player_id| {
            let (net, games_played) = totals.get(&player_id).copied().unwrap_or_default();
            Standing {
                player_name: PlayerName::resolve(roster.get(&player_id).copied()),
                player_id,
                net,
                games_played,
            }
        })
        .collect();
    standings.sort_by(|a, b| b.net.partial_cmp(&a.net).unwrap_or(Ordering::Equal));
    log::debug!("Computed {} standings for {period:?}", standings.len());
    standings
}

pub fn top_winner(standings: &[Standing]) -> Option<&Standing> {
    standings.first()
}

/// Money that changed hands: the sum of every positive net.
pub fn total_paid_out(standings: &[Standing]) -> f64 {
    standings.iter().map(|s| s.net).filter(|&net| net > 0.0).sum()
}
