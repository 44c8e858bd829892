//! Game Statistics Repository Gateway
//!
//! Abstract trait defining the contract for statistics persistence.

use async_trait::async_trait;

use crate::domain::models::game_statistics::GameStatisticsTotals;
use crate::shared::errors::RepositoryError;

/// Repository trait for the running statistics totals
#[async_trait]
pub trait GameStatisticsRepository: Send + Sync {
    /// Add the increment of one finished game to the stored totals
    async fn record(&self, increment: &GameStatisticsTotals) -> Result<(), RepositoryError>;

    /// Read the stored totals, `None` if no game was ever recorded
    async fn totals(&self) -> Result<Option<GameStatisticsTotals>, RepositoryError>;
}
