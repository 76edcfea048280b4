use async_trait::async_trait;
use types::{Game, GameId, Player, PlayerId};

use crate::DatabaseError;

#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn list_players(&self) -> Result<Vec<Player>, DatabaseError>;
    /// Replaces the player with the same id, or appends a new one.
    async fn upsert_player(&mut self, player: Player) -> Result<(), DatabaseError>;
    /// Removing an id that is not in the roster does nothing.
    async fn remove_player(&mut self, id: &PlayerId) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Most recent first.
    async fn list_games(&self) -> Result<Vec<Game>, DatabaseError>;
    async fn append_game(&mut self, game: Game) -> Result<(), DatabaseError>;

    async fn get_game(&self, id: &GameId) -> Result<Game, DatabaseError> {
        self.list_games()
            .await?
            .into_iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| DatabaseError::GameNotFound(id.to_string()))
    }
}
