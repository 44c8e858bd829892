//! Domain Models
//!
//! Pure domain entities and value objects of the game: the board, game
//! sessions, the events players receive and statistics.

pub mod board;
pub mod game_event;
pub mod game_session;
pub mod game_statistics;
pub mod ids;

pub use board::{Coordinate, Ship, Strike, BOARD_SIZE, FLEET_SHIP_LENGTHS};
pub use game_event::{GameEvent, GameEventType};
pub use game_session::{GameMode, GameSession, GameState, PlayerBoard, PlayerSlot, StrikeOutcome};
pub use game_statistics::{GameStatistics, GameStatisticsTotals};
pub use ids::{ConnectionId, GameId};
