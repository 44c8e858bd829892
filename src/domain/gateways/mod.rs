//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod game_statistics_repository;
pub mod player_notifier;

pub use game_statistics_repository::GameStatisticsRepository;
pub use player_notifier::PlayerNotifier;
