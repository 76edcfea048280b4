use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use types::{
    Game, GameError, GameId, Player, PlayerGameSummary, PlayerId, Round, RoundResult, RoundStatus,
    StakeSchedule,
};

use crate::summary::summarize;
use crate::validate::{validate_round, RoundValidation, RoundValidationError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameBuildError {
    #[error("Select at least two players, {0} selected")]
    NotEnoughPlayers(usize),

    #[error("Round {round} has no result for player {player_id}")]
    IncompleteRound { round: u32, player_id: PlayerId },

    #[error("Round {round}: {source}")]
    InvalidRound {
        round: u32,
        #[source]
        source: RoundValidationError,
    },

    #[error("Round {0} is not part of the stake schedule")]
    NoSuchRound(u32),

    #[error("Player {0} is not selected for this game")]
    NotSelected(PlayerId),

    #[error("Player {0} is listed more than once")]
    DuplicatePlayer(PlayerId),

    #[error("Expected winners for {expected} rounds, got {actual}")]
    RoundCount { expected: usize, actual: usize },

    #[error(transparent)]
    Invariant(#[from] GameError),
}

/// Running totals for one round while results are still being entered.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundPreview {
    pub number: u32,
    pub stake: f64,
    pub winners: usize,
    pub losers: usize,
    pub pot: f64,
    pub per_winner: f64,
    /// Every selected player has a status.
    pub is_complete: bool,
    /// Validation of the statuses entered so far.
    pub validation: RoundValidation,
}

/// Collects the participants and round outcomes of a game step by step and
/// assembles a [`Game`] that satisfies every invariant.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    schedule: StakeSchedule,
    selected: Vec<PlayerId>,
    rounds: Vec<HashMap<PlayerId, RoundStatus>>,
    location: Option<String>,
    notes: Option<String>,
}

/// Splits a comma-separated list of player ids, skipping blanks.
pub fn parse_player_ids(list: &str) -> Vec<PlayerId> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PlayerId::from)
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl GameBuilder {
    pub fn new(schedule: StakeSchedule) -> Self {
        let rounds = vec![HashMap::new(); schedule.rounds()];
        Self {
            schedule,
            selected: Vec::new(),
            rounds,
            location: None,
            notes: None,
        }
    }

    /// Selects `players` in order and, for each round, marks the listed
    /// winners as winning and every other participant as losing.
    pub fn from_round_winners(
        schedule: StakeSchedule,
        players: &[PlayerId],
        round_winners: &[Vec<PlayerId>],
    ) -> Result<Self, GameBuildError> {
        let mut builder = Self::new(schedule);
        for player_id in players {
            if !builder.select_player(player_id) {
                return Err(GameBuildError::DuplicatePlayer(player_id.clone()));
            }
        }
        if round_winners.len() != builder.schedule.rounds() {
            return Err(GameBuildError::RoundCount {
                expected: builder.schedule.rounds(),
                actual: round_winners.len(),
            });
        }

        for (idx, winners) in round_winners.iter().enumerate() {
            let round = idx as u32 + 1;
            if let Some(stranger) = winners.iter().find(|w| !builder.selected.contains(*w)) {
                return Err(GameBuildError::NotSelected(stranger.clone()));
            }
            for player_id in builder.selected.clone() {
                let status = if winners.contains(&player_id) {
                    RoundStatus::Win
                } else {
                    RoundStatus::Lose
                };
                builder.set_status(round, &player_id, status)?;
            }
        }
        Ok(builder)
    }

    pub fn selected(&self) -> &[PlayerId] {
        &self.selected
    }

    /// Adds the player to the game unless already selected. Returns whether
    /// the player was newly added.
    pub fn select_player(&mut self, player_id: &PlayerId) -> bool {
        if self.selected.contains(player_id) {
            return false;
        }
        self.selected.push(player_id.clone());
        true
    }

    /// Adds the player to the game, or removes them along with any statuses
    /// already entered for them. Returns whether the player is now selected.
    pub fn toggle_player(&mut self, player_id: &PlayerId) -> bool {
        if let Some(idx) = self.selected.iter().position(|p| p == player_id) {
            self.selected.remove(idx);
            for round in self.rounds.iter_mut() {
                round.remove(player_id);
            }
            false
        } else {
            self.select_player(player_id)
        }
    }

    pub fn set_status(
        &mut self,
        round_number: u32,
        player_id: &PlayerId,
        status: RoundStatus,
    ) -> Result<(), GameBuildError> {
        if !self.selected.contains(player_id) {
            return Err(GameBuildError::NotSelected(player_id.clone()));
        }
        let round = self.round_mut(round_number)?;
        round.insert(player_id.clone(), status);
        Ok(())
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = non_blank(location);
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = non_blank(notes);
    }

    pub fn round_preview(&self, round_number: u32) -> Result<RoundPreview, GameBuildError> {
        let statuses = self.round(round_number)?;
        let stake = self
            .schedule
            .stake_for(round_number)
            .ok_or(GameBuildError::NoSuchRound(round_number))?;

        let entered: Vec<RoundStatus> = self
            .selected
            .iter()
            .filter_map(|p| statuses.get(p).copied())
            .collect();
        let winners = entered.iter().filter(|s| **s == RoundStatus::Win).count();
        let losers = entered.len() - winners;
        let pot = losers as f64 * stake;
        let per_winner = if winners > 0 {
            pot / winners as f64
        } else {
            0.0
        };

        Ok(RoundPreview {
            number: round_number,
            stake,
            winners,
            losers,
            pot,
            per_winner,
            is_complete: entered.len() == self.selected.len(),
            validation: validate_round(&entered).into(),
        })
    }

    /// Summary of the game as entered so far, for review before saving.
    /// Players without a status in a round net zero for it.
    pub fn preview(&self, players: &[Player]) -> Vec<PlayerGameSummary> {
        let game = self.assemble(GameId::from("preview"), Utc::now());
        summarize(&game, players)
    }

    pub fn build(&self, played_at: DateTime<Utc>) -> Result<Game, GameBuildError> {
        if self.selected.len() < 2 {
            return Err(GameBuildError::NotEnoughPlayers(self.selected.len()));
        }
        for (idx, statuses) in self.rounds.iter().enumerate() {
            let round = idx as u32 + 1;
            if let Some(missing) = self.selected.iter().find(|p| !statuses.contains_key(*p)) {
                return Err(GameBuildError::IncompleteRound {
                    round,
                    player_id: missing.clone(),
                });
            }
            validate_round(statuses.values())
                .map_err(|source| GameBuildError::InvalidRound { round, source })?;
        }

        let game = self.assemble(GameId::new(), played_at);
        game.check_invariants(&self.schedule)?;
        log::info!(
            "Built game {} with {} players over {} rounds",
            game.id,
            game.players.len(),
            game.rounds.len()
        );
        Ok(game)
    }

    fn assemble(&self, id: GameId, played_at: DateTime<Utc>) -> Game {
        let rounds = self
            .schedule
            .stakes()
            .iter()
            .zip(self.rounds.iter())
            .enumerate()
            .map(|(idx, (&stake, statuses))| Round {
                number: idx as u32 + 1,
                stake,
                results: self
                    .selected
                    .iter()
                    .filter_map(|p| statuses.get(p).map(|&s| RoundResult::new(p.clone(), s)))
                    .collect(),
            })
            .collect();

        Game {
            id,
            played_at,
            location: self.location.clone(),
            notes: self.notes.clone(),
            players: self.selected.clone(),
            rounds,
        }
    }

    fn round(&self, round_number: u32) -> Result<&HashMap<PlayerId, RoundStatus>, GameBuildError> {
        (round_number as usize)
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx))
            .ok_or(GameBuildError::NoSuchRound(round_number))
    }

    fn round_mut(
        &mut self,
        round_number: u32,
    ) -> Result<&mut HashMap<PlayerId, RoundStatus>, GameBuildError> {
        (round_number as usize)
            .checked_sub(1)
            .and_then(|idx| self.rounds.get_mut(idx))
            .ok_or(GameBuildError::NoSuchRound(round_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RoundStatus::{Lose, Win};

    fn builder(players: &[&str]) -> GameBuilder {
        let mut builder = GameBuilder::new(StakeSchedule::default());
        for &p in players {
            builder.toggle_player(&p.into());
        }
        builder
    }

    fn fill(builder: &mut GameBuilder, round: u32, statuses: &[(&str, RoundStatus)]) {
        for &(p, status) in statuses {
            builder.set_status(round, &p.into(), status).unwrap();
        }
    }

    #[test]
    fn test_build_complete_game() {
        let mut builder = builder(&["p1", "p2", "p3"]);
        builder.set_location("  Quinta da Baroneza ");
        builder.set_notes("   ");
        for round in 1..=3 {
            fill(&mut builder, round, &[("p1", Win), ("p2", Lose), ("p3", Lose)]);
        }

        let game = builder.build(Utc::now()).unwrap();
        assert_eq!(game.players.len(), 3);
        assert_eq!(game.location.as_deref(), Some("Quinta da Baroneza"));
        assert_eq!(game.notes, None);
        let stakes: Vec<_> = game.rounds.iter().map(|r| r.stake).collect();
        assert_eq!(stakes, vec![15.0, 15.0, 20.0]);
        assert_eq!(game.check_invariants(&StakeSchedule::default()), Ok(()));
    }

    #[test]
    fn test_needs_two_players() {
        let builder = builder(&["p1"]);
        assert_eq!(
            builder.build(Utc::now()).unwrap_err(),
            GameBuildError::NotEnoughPlayers(1)
        );
    }

    #[test]
    fn test_incomplete_round_is_reported() {
        let mut builder = builder(&["p1", "p2"]);
        fill(&mut builder, 1, &[("p1", Win), ("p2", Lose)]);
        fill(&mut builder, 2, &[("p1", Win)]);
        assert_eq!(
            builder.build(Utc::now()).unwrap_err(),
            GameBuildError::IncompleteRound {
                round: 2,
                player_id: "p2".into()
            }
        );
    }

    #[test]
    fn test_degenerate_round_blocks_build() {
        let mut builder = builder(&["p1", "p2"]);
        fill(&mut builder, 1, &[("p1", Win), ("p2", Lose)]);
        fill(&mut builder, 2, &[("p1", Win), ("p2", Win)]);
        fill(&mut builder, 3, &[("p1", Win), ("p2", Lose)]);
        let err = builder.build(Utc::now()).unwrap_err();
        assert_eq!(
            err,
            GameBuildError::InvalidRound {
                round: 2,
                source: RoundValidationError::NoLosers
            }
        );
        assert_eq!(
            err.to_string(),
            "Round 2: at least one player must lose (who pays?)."
        );
    }

    #[test]
    fn test_round_preview() {
        let mut builder = builder(&["p1", "p2", "p3", "p4"]);
        fill(&mut builder, 3, &[("p1", Win), ("p2", Lose), ("p3", Lose)]);

        let preview = builder.round_preview(3).unwrap();
        assert_eq!(preview.stake, 20.0);
        assert_eq!((preview.winners, preview.losers), (1, 2));
        assert_eq!(preview.pot, 40.0);
        assert_eq!(preview.per_winner, 40.0);
        assert!(!preview.is_complete);
        assert!(preview.validation.is_valid);

        let empty = builder.round_preview(1).unwrap();
        assert_eq!(empty.per_winner, 0.0);
        assert!(!empty.validation.is_valid);

        assert_eq!(
            builder.round_preview(4).unwrap_err(),
            GameBuildError::NoSuchRound(4)
        );
    }

    #[test]
    fn test_deselect_clears_statuses() {
        let mut builder = builder(&["p1", "p2", "p3"]);
        fill(&mut builder, 1, &[("p1", Win), ("p2", Lose), ("p3", Lose)]);
        assert!(!builder.toggle_player(&"p3".into()));
        assert_eq!(builder.round_preview(1).unwrap().losers, 1);
        assert!(builder.round_preview(1).unwrap().is_complete);

        assert_eq!(
            builder.set_status(1, &"p3".into(), Win),
            Err(GameBuildError::NotSelected("p3".into()))
        );
    }

    #[test]
    fn test_preview_summary() {
        let mut builder = builder(&["p1", "p2"]);
        fill(&mut builder, 1, &[("p1", Lose), ("p2", Win)]);
        let roster = vec![Player::new_with_id("p2".into(), "Scottie Scheffler", Some("Scottie"))];

        let summaries = builder.preview(&roster);
        assert_eq!(summaries[0].player_name.to_string(), "Scottie");
        assert_eq!(summaries[0].round_details, vec![15.0, 0.0, 0.0]);
        assert_eq!(summaries[1].player_name.to_string(), "Unknown");
    }

    fn ids(list: &[&str]) -> Vec<PlayerId> {
        list.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_select_player_is_idempotent() {
        let mut builder = builder(&["p1"]);
        assert!(!builder.select_player(&"p1".into()));
        assert!(builder.select_player(&"p2".into()));
        assert_eq!(builder.selected(), &ids(&["p1", "p2"])[..]);
    }

    #[test]
    fn test_parse_player_ids() {
        assert_eq!(parse_player_ids(" b, c ,,"), ids(&["b", "c"]));
        assert!(parse_player_ids(" ").is_empty());
    }

    #[test]
    fn test_from_round_winners() {
        let winners = vec![ids(&["b"]), ids(&["b"]), ids(&["c"])];
        let game = GameBuilder::from_round_winners(
            StakeSchedule::default(),
            &ids(&["a", "b", "c"]),
            &winners,
        )
        .unwrap()
        .build(Utc::now())
        .unwrap();

        assert_eq!(game.players, ids(&["a", "b", "c"]));
        for round in &game.rounds {
            assert_eq!(round.status_of(&"a".into()), Some(Lose));
        }
        assert_eq!(game.rounds[2].status_of(&"c".into()), Some(Win));
        assert_eq!(game.rounds[2].status_of(&"b".into()), Some(Lose));
    }

    #[test]
    fn test_repeated_player_is_rejected() {
        let winners = vec![ids(&["b"]), ids(&["b"]), ids(&["c"])];
        let err = GameBuilder::from_round_winners(
            StakeSchedule::default(),
            &ids(&["a", "b", "c", "a"]),
            &winners,
        )
        .unwrap_err();
        assert_eq!(err, GameBuildError::DuplicatePlayer("a".into()));
    }

    #[test]
    fn test_round_winners_must_match_schedule() {
        let players = ids(&["a", "b"]);
        assert_eq!(
            GameBuilder::from_round_winners(StakeSchedule::default(), &players, &[ids(&["a"])])
                .unwrap_err(),
            GameBuildError::RoundCount {
                expected: 3,
                actual: 1
            }
        );

        let winners = vec![ids(&["a"]), ids(&["z"]), ids(&["b"])];
        assert_eq!(
            GameBuilder::from_round_winners(StakeSchedule::default(), &players, &winners)
                .unwrap_err(),
            GameBuildError::NotSelected("z".into())
        );
    }
}
