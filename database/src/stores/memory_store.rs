use async_trait::async_trait;
use types::{Game, Player, PlayerId};

use super::{GameStore, RosterStore};
use crate::models::warn_degenerate_rounds;
use crate::DatabaseError;

/// Keeps the roster and game history in process, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    players: Vec<Player>,
    games: Vec<Game>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            games: Vec::new(),
        }
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn list_players(&self) -> Result<Vec<Player>, DatabaseError> {
        Ok(self.players.clone())
    }

    async fn upsert_player(&mut self, player: Player) -> Result<(), DatabaseError> {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
        Ok(())
    }

    async fn remove_player(&mut self, id: &PlayerId) -> Result<(), DatabaseError> {
        let before = self.players.len();
        self.players.retain(|p| &p.id != id);
        if self.players.len() == before {
            tracing::warn!(player_id = %id, "No such player to remove");
        }
        Ok(())
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn list_games(&self) -> Result<Vec<Game>, DatabaseError> {
        Ok(self.games.clone())
    }

    async fn append_game(&mut self, game: Game) -> Result<(), DatabaseError> {
        warn_degenerate_rounds(&game);
        self.games.insert(0, game);
        Ok(())
    }
}
