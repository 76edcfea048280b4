pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod stores;

pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use models::{GAMES_KEY, PLAYERS_KEY};
pub use retry::retry_with_backoff;
pub use stores::{GameStore, MemoryStore, RosterStore, SqliteStore};
