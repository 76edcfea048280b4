pub mod builder;
pub mod config;
pub mod export;
pub mod search;
pub mod settle;
pub mod standings;
pub mod summary;
pub mod validate;

pub use builder::{parse_player_ids, GameBuildError, GameBuilder, RoundPreview};
pub use config::{ConfigError, LedgerConfig};
pub use export::{export_filename, summary_csv_string, write_summary_csv, ExportError};
pub use search::{filter_games, filter_games_in, filter_players};
pub use settle::{pot, settle, settle_checked};
pub use standings::{standings, top_winner, total_paid_out, Period, Standing};
pub use summary::summarize;
pub use validate::{validate_results, validate_round, RoundValidation, RoundValidationError};
