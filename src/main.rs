//! Battleship Game Backend - Main Entry Point

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use battleship_backend::application::services::GameSessionService;
use battleship_backend::application::use_cases::GetGameStatisticsUseCase;
use battleship_backend::infrastructure::driven_adapters::config::AppConfig;
use battleship_backend::infrastructure::driven_adapters::database;
use battleship_backend::infrastructure::driven_adapters::{ConnectionRegistry, MariaDbGameStatisticsRepository};
use battleship_backend::infrastructure::driving_adapters::api_rest::AppState;
use battleship_backend::infrastructure::driving_adapters::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battleship_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations
    database::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repository and connection registry
    let statistics_repository = Arc::new(MariaDbGameStatisticsRepository::new(pool));
    let connections = Arc::new(ConnectionRegistry::new());

    // Create use cases and the game engine
    let get_game_statistics_use_case = Arc::new(GetGameStatisticsUseCase::new(statistics_repository.clone()));
    let game_session_service = Arc::new(GameSessionService::new(
        connections.clone(),
        statistics_repository,
        config.game.settings(),
    ));

    // Create application state
    let app_state = AppState {
        config: Arc::new(config.clone()),
        get_game_statistics_use_case,
        game_session_service,
        connections,
    };

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
