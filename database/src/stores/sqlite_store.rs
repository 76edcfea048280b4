use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqliteConnection, SqlitePool};
use types::{Game, Player, PlayerId};

use super::{GameStore, RosterStore};
use crate::models::{decode_collection, encode_collection, warn_degenerate_rounds, GAMES_KEY, PLAYERS_KEY};
use crate::{retry_with_backoff, DatabaseConfig, DatabaseError};

/// Stores the roster and the game history as two JSON arrays in a single
/// key-value table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the pool, retrying while the database file is busy, and makes
    /// sure the table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = retry_with_backoff(
            "Connecting to the ledger database",
            || config.create_pool(),
            3,
            Duration::from_millis(100),
        )
        .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        tracing::info!(url = %config.url, "Opened ledger database");
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, DatabaseError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        read_collection(&mut conn, key).await
    }

    /// Read-modify-write of one collection inside a transaction.
    async fn update<T, F>(&self, key: &str, modify: F) -> Result<(), DatabaseError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut Vec<T>) -> Result<(), DatabaseError>,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;

        let mut items = read_collection::<T>(&mut tx, key).await?;
        modify(&mut items)?;
        write_collection(&mut tx, key, &items).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::Transaction(e.to_string()))?;
        Ok(())
    }
}

async fn read_collection<T: DeserializeOwned>(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Vec<T>, DatabaseError> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

    let raw: Option<String> = match row {
        Some(r) => Some(
            r.try_get("value")
                .map_err(|e| DatabaseError::Query(e.to_string()))?,
        ),
        None => None,
    };
    decode_collection(raw.as_deref())
}

async fn write_collection<T: Serialize>(
    conn: &mut SqliteConnection,
    key: &str,
    items: &[T],
) -> Result<(), DatabaseError> {
    let json = encode_collection(items)?;
    sqlx::query(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(json)
    .bind(chrono::Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl RosterStore for SqliteStore {
    async fn list_players(&self) -> Result<Vec<Player>, DatabaseError> {
        self.read(PLAYERS_KEY).await
    }

    async fn upsert_player(&mut self, player: Player) -> Result<(), DatabaseError> {
        tracing::debug!(player_id = %player.id, "Saving player {}", player.name);
        self.update(PLAYERS_KEY, move |players: &mut Vec<Player>| {
            match players.iter_mut().find(|p| p.id == player.id) {
                Some(existing) => *existing = player,
                None => players.push(player),
            }
            Ok(())
        })
        .await
    }

    async fn remove_player(&mut self, id: &PlayerId) -> Result<(), DatabaseError> {
        let mut removed = false;
        self.update(PLAYERS_KEY, |players: &mut Vec<Player>| {
            let before = players.len();
            players.retain(|p| &p.id != id);
            removed = players.len() < before;
            Ok(())
        })
        .await?;
        if removed {
            tracing::info!(player_id = %id, "Removed player from roster");
        } else {
            tracing::warn!(player_id = %id, "No such player to remove");
        }
        Ok(())
    }
}

#[async_trait]
impl GameStore for SqliteStore {
    async fn list_games(&self) -> Result<Vec<Game>, DatabaseError> {
        self.read(GAMES_KEY).await
    }

    async fn append_game(&mut self, game: Game) -> Result<(), DatabaseError> {
        warn_degenerate_rounds(&game);
        let game_id = game.id.clone();
        self.update(GAMES_KEY, move |games: &mut Vec<Game>| {
            games.insert(0, game);
            Ok(())
        })
        .await?;
        tracing::info!(game_id = %game_id, "Stored game");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        let pool = DatabaseConfig::in_memory()
            .create_pool()
            .await
            .expect("Failed to create test database pool");
        let store = SqliteStore::new(pool);
        store.init_schema().await.expect("Failed to create table");
        store
    }

    #[tokio::test]
    async fn test_empty_database_reads_empty() {
        let store = store().await;
        assert!(store.list_players().await.unwrap().is_empty());
        assert!(store.list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_and_retrieve_player() {
        let mut store = store().await;
        let player = Player::new("Scottie Scheffler", Some("Scottie"));
        store.upsert_player(player.clone()).await.unwrap();

        let players = store.list_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, player.id);
        assert_eq!(players[0].display_name(), "Scottie");
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let mut store = store().await;
        store
            .upsert_player(Player::new("Jon Rahm", Some("Rahmbo")))
            .await
            .unwrap();
        store.init_schema().await.unwrap();
        assert_eq!(store.list_players().await.unwrap().len(), 1);
    }
}
