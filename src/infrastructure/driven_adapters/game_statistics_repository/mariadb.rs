//! MariaDB Game Statistics Repository Implementation
//!
//! Implements the GameStatisticsRepository trait using SQLx for MariaDB.
//! All totals live in the single row with `id = 1`.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::domain::gateways::GameStatisticsRepository;
use crate::domain::models::game_statistics::GameStatisticsTotals;
use crate::shared::errors::RepositoryError;

const STATISTICS_ROW_ID: i32 = 1;

/// Database row representation for the game_statistics table
#[derive(Debug, sqlx::FromRow)]
struct GameStatisticsRow {
    pvp_games_total: i64,
    pvp_games_completed: i64,
    pvp_hits: i64,
    pvp_misses: i64,
    pvp_ships_sunk: i64,
    ai_games_total: i64,
    ai_games_completed: i64,
    ai_games_won: i64,
    ai_player_hits: i64,
    ai_player_misses: i64,
    ai_player_ships_sunk: i64,
    ai_opponent_hits: i64,
    ai_opponent_misses: i64,
    ai_opponent_ships_sunk: i64,
}

impl From<GameStatisticsRow> for GameStatisticsTotals {
    fn from(row: GameStatisticsRow) -> Self {
        Self {
            pvp_games_total: row.pvp_games_total,
            pvp_games_completed: row.pvp_games_completed,
            pvp_hits: row.pvp_hits,
            pvp_misses: row.pvp_misses,
            pvp_ships_sunk: row.pvp_ships_sunk,
            ai_games_total: row.ai_games_total,
            ai_games_completed: row.ai_games_completed,
            ai_games_won: row.ai_games_won,
            ai_player_hits: row.ai_player_hits,
            ai_player_misses: row.ai_player_misses,
            ai_player_ships_sunk: row.ai_player_ships_sunk,
            ai_opponent_hits: row.ai_opponent_hits,
            ai_opponent_misses: row.ai_opponent_misses,
            ai_opponent_ships_sunk: row.ai_opponent_ships_sunk,
        }
    }
}

/// MariaDB implementation of GameStatisticsRepository
pub struct MariaDbGameStatisticsRepository {
    pool: MySqlPool,
}

impl MariaDbGameStatisticsRepository {
    /// Create a new MariaDbGameStatisticsRepository
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStatisticsRepository for MariaDbGameStatisticsRepository {
    async fn record(&self, increment: &GameStatisticsTotals) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO game_statistics (id) VALUES (?) ON DUPLICATE KEY UPDATE id = id")
            .bind(STATISTICS_ROW_ID)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE game_statistics SET
                pvp_games_total = pvp_games_total + ?,
                pvp_games_completed = pvp_games_completed + ?,
                pvp_hits = pvp_hits + ?,
                pvp_misses = pvp_misses + ?,
                pvp_ships_sunk = pvp_ships_sunk + ?,
                ai_games_total = ai_games_total + ?,
                ai_games_completed = ai_games_completed + ?,
                ai_games_won = ai_games_won + ?,
                ai_player_hits = ai_player_hits + ?,
                ai_player_misses = ai_player_misses + ?,
                ai_player_ships_sunk = ai_player_ships_sunk + ?,
                ai_opponent_hits = ai_opponent_hits + ?,
                ai_opponent_misses = ai_opponent_misses + ?,
                ai_opponent_ships_sunk = ai_opponent_ships_sunk + ?
            WHERE id = ?
            "#,
        )
        .bind(increment.pvp_games_total)
        .bind(increment.pvp_games_completed)
        .bind(increment.pvp_hits)
        .bind(increment.pvp_misses)
        .bind(increment.pvp_ships_sunk)
        .bind(increment.ai_games_total)
        .bind(increment.ai_games_completed)
        .bind(increment.ai_games_won)
        .bind(increment.ai_player_hits)
        .bind(increment.ai_player_misses)
        .bind(increment.ai_player_ships_sunk)
        .bind(increment.ai_opponent_hits)
        .bind(increment.ai_opponent_misses)
        .bind(increment.ai_opponent_ships_sunk)
        .bind(STATISTICS_ROW_ID)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Recorded game statistics");
        Ok(())
    }

    async fn totals(&self) -> Result<Option<GameStatisticsTotals>, RepositoryError> {
        let row = sqlx::query_as::<_, GameStatisticsRow>(
            r#"
            SELECT pvp_games_total, pvp_games_completed, pvp_hits, pvp_misses,
                   pvp_ships_sunk, ai_games_total, ai_games_completed, ai_games_won,
                   ai_player_hits, ai_player_misses, ai_player_ships_sunk,
                   ai_opponent_hits, ai_opponent_misses, ai_opponent_ships_sunk
            FROM game_statistics
            WHERE id = ?
            "#,
        )
        .bind(STATISTICS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GameStatisticsTotals::from))
    }
}
