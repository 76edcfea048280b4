use std::fmt::Display;

use chrono::{Local, TimeZone};
use types::{Game, Player, PlayerName};

use crate::summary::roster_index;

/// Games matching `term` by local played date (`YYYY-MM-DD` or
/// `DD/MM/YYYY`), location, or the display name of any participant. A blank
/// term matches everything.
pub fn filter_games<'a>(games: &'a [Game], players: &[Player], term: &str) -> Vec<&'a Game> {
    filter_games_in(games, players, term, &Local)
}

/// [`filter_games`] with dates read in `tz`.
pub fn filter_games_in<'a, Tz>(
    games: &'a [Game],
    players: &[Player],
    term: &str,
    tz: &Tz,
) -> Vec<&'a Game>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return games.iter().collect();
    }
    let roster = roster_index(players);

    games
        .iter()
        .filter(|game| {
            let played_at = game.played_at.with_timezone(tz);
            let iso_date = played_at.format("%Y-%m-%d").to_string();
            let local_date = played_at.format("%d/%m/%Y").to_string();
            let location_match = game
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&term));
            let player_match = game.players.iter().any(|id| {
                match PlayerName::resolve(roster.get(id).copied()) {
                    PlayerName::Resolved(name) => name.to_lowercase().contains(&term),
                    PlayerName::Unknown => false,
                }
            });
            iso_date.contains(&term) || local_date.contains(&term) || location_match || player_match
        })
        .collect()
}

/// Roster entries whose name or nickname contains `term`, ignoring case.
pub fn filter_players<'a>(players: &'a [Player], term: &str) -> Vec<&'a Player> {
    let term = term.trim().to_lowercase();
    players
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term)
                || p.nickname
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use types::GameId;

    fn game(location: Option<&str>, players: &[&str]) -> Game {
        Game {
            id: GameId::new(),
            played_at: Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap(),
            location: location.map(str::to_string),
            notes: None,
            players: players.iter().map(|&p| p.into()).collect(),
            rounds: Vec::new(),
        }
    }

    fn roster() -> Vec<Player> {
        vec![
            Player::new_with_id("1".into(), "Tiger Woods", Some("The GOAT")),
            Player::new_with_id("2".into(), "Rory McIlroy", Some("Rors")),
            Player::new_with_id("3".into(), "Jon Rahm", None),
        ]
    }

    #[test]
    fn test_blank_term_keeps_all() {
        let games = vec![game(None, &["1", "2"]), game(Some("Augusta"), &["2", "3"])];
        assert_eq!(filter_games(&games, &roster(), "  ").len(), 2);
    }

    #[test]
    fn test_match_by_location_and_player() {
        let games = vec![game(None, &["1", "2"]), game(Some("Augusta"), &["2", "3"])];
        let roster = roster();

        let found = filter_games(&games, &roster, "augusta");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.as_deref(), Some("Augusta"));

        assert_eq!(filter_games(&games, &roster, "goat").len(), 1);
        assert_eq!(filter_games(&games, &roster, "RAHM").len(), 1);
        assert_eq!(filter_games(&games, &roster, "rors").len(), 2);
        assert!(filter_games(&games, &roster, "scheffler").is_empty());
    }

    #[test]
    fn test_match_by_date() {
        let games = vec![game(None, &["1", "2"])];
        assert_eq!(filter_games(&games, &[], "2026-03-07").len(), 1);
        assert_eq!(filter_games(&games, &[], "07/03").len(), 1);
        assert!(filter_games(&games, &[], "2026-04").is_empty());
    }

    #[test]
    fn test_date_follows_timezone() {
        let mut late = game(None, &["1", "2"]);
        late.played_at = Utc.with_ymd_and_hms(2026, 3, 7, 23, 30, 0).unwrap();
        let games = vec![late];

        let utc = FixedOffset::east_opt(0).unwrap();
        let madrid = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(filter_games_in(&games, &[], "2026-03-07", &utc).len(), 1);
        assert!(filter_games_in(&games, &[], "2026-03-07", &madrid).is_empty());
        assert_eq!(filter_games_in(&games, &[], "08/03/2026", &madrid).len(), 1);
    }

    #[test]
    fn test_filter_players() {
        let roster = roster();
        let found = filter_players(&roster, "ro");
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rory McIlroy"]);
        assert_eq!(filter_players(&roster, "goat")[0].name, "Tiger Woods");
        assert_eq!(filter_players(&roster, "").len(), 3);
    }
}
