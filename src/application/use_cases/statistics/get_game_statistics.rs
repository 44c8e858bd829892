//! Get Game Statistics Use Case
//!
//! Retrieves the statistics totals of all recorded games.

use std::sync::Arc;

use crate::domain::gateways::GameStatisticsRepository;
use crate::domain::models::game_statistics::GameStatisticsTotals;
use crate::shared::errors::UseCaseError;

/// Use case for reading the statistics totals
pub struct GetGameStatisticsUseCase {
    statistics_repository: Arc<dyn GameStatisticsRepository>,
}

impl GetGameStatisticsUseCase {
    /// Create a new GetGameStatisticsUseCase
    #[must_use]
    pub fn new(statistics_repository: Arc<dyn GameStatisticsRepository>) -> Self {
        Self { statistics_repository }
    }

    /// Execute the use case; all counters are zero before the first game is recorded
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self) -> Result<GameStatisticsTotals, UseCaseError> {
        tracing::debug!("Getting game statistics");

        let totals = self.statistics_repository.totals().await?.unwrap_or_default();

        tracing::debug!(
            pvp_games = totals.pvp_games_total,
            ai_games = totals.ai_games_total,
            "Found game statistics"
        );
        Ok(totals)
    }
}
