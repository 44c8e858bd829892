//! Statistics Use Cases
//!
//! Recording finished games and reading the running totals.

mod get_game_statistics;
mod record_game_statistics;

pub use get_game_statistics::GetGameStatisticsUseCase;
pub use record_game_statistics::RecordGameStatisticsUseCase;
