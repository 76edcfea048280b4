pub mod game;
pub mod player;
pub mod round;
pub mod stakes;
pub mod summary;

pub use game::{Game, GameError, GameId};
pub use player::{Player, PlayerId, PlayerName};
pub use round::{Round, RoundResult, RoundStatus};
pub use stakes::{StakeSchedule, StakeScheduleError};
pub use summary::{Direction, PlayerGameSummary};
