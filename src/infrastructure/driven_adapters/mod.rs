//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Configuration
//! - Database pool and the statistics repository
//! - WebSocket connections players are notified through

pub mod config;
pub mod database;
pub mod game_statistics_repository;
pub mod player_notifier;

pub use config::AppConfig;
pub use game_statistics_repository::MariaDbGameStatisticsRepository;
pub use player_notifier::{ConnectionRegistry, OutgoingMessage};
