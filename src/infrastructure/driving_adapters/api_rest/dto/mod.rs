//! Data Transfer Objects
//!
//! Response DTOs for the REST API.

pub mod game_statistics;

pub use game_statistics::{ActiveGamesDto, GameStatisticsDto};
