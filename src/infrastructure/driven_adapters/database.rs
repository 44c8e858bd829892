//! Database Connection Management
//!
//! Utilities for creating and managing database connections.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::config::DatabaseConfig;

/// Create a MariaDB connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
