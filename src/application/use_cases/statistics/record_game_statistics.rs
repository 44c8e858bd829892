//! Record Game Statistics Use Case
//!
//! Adds the statistics of a finished game to the stored totals.

use std::sync::Arc;

use crate::domain::gateways::GameStatisticsRepository;
use crate::domain::models::game_statistics::{GameStatistics, GameStatisticsTotals};
use crate::shared::errors::UseCaseError;

/// Use case for recording one finished game
pub struct RecordGameStatisticsUseCase {
    statistics_repository: Arc<dyn GameStatisticsRepository>,
}

impl RecordGameStatisticsUseCase {
    /// Create a new RecordGameStatisticsUseCase
    #[must_use]
    pub fn new(statistics_repository: Arc<dyn GameStatisticsRepository>) -> Self {
        Self { statistics_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, game: &GameStatistics) -> Result<(), UseCaseError> {
        tracing::debug!(ai_game = game.ai_game, completed = game.completed, "Recording game statistics");

        let increment = GameStatisticsTotals::from(game);
        self.statistics_repository.record(&increment).await?;

        Ok(())
    }
}
