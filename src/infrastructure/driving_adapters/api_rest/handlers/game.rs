//! Game Handlers
//!
//! HTTP handlers for statistics and server status.

use axum::{extract::State, routing::get, Json, Router};

use crate::infrastructure::driving_adapters::api_rest::dto::{ActiveGamesDto, GameStatisticsDto};
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::ApiError;

/// Create the router for game endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/game-statistics", get(get_game_statistics))
        .route("/current-games", get(get_current_games))
        .route("/server-status", get(get_server_status))
}

/// GET /game-statistics - Totals of all recorded games
///
/// # Responses
///
/// * 200 OK - Statistics totals, all zero before the first recorded game
/// * 500 Internal Server Error - Database failure
#[axum::debug_handler]
async fn get_game_statistics(State(state): State<AppState>) -> Result<Json<GameStatisticsDto>, ApiError> {
    let totals = state.get_game_statistics_use_case.execute().await?;
    Ok(Json(GameStatisticsDto::from(totals)))
}

/// GET /current-games - Number of games in progress or waiting for a player
#[axum::debug_handler]
async fn get_current_games(State(state): State<AppState>) -> Json<ActiveGamesDto> {
    Json(ActiveGamesDto {
        active_games: state.game_session_service.active_games(),
    })
}

/// GET /server-status - Liveness check
async fn get_server_status() -> &'static str {
    "Server is online"
}
