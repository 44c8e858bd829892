//! Domain Layer
//!
//! Contains the core game logic, domain models, and gateway traits (ports).
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;
pub mod services;

pub use gateways::{GameStatisticsRepository, PlayerNotifier};
pub use models::{
    ConnectionId, Coordinate, GameEvent, GameEventType, GameId, GameMode, GameSession, GameStatistics,
    GameStatisticsTotals, Ship, Strike,
};
