//! REST API Module
//!
//! Contains HTTP handlers, DTOs, and middleware for the REST API.

pub mod dto;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use crate::application::services::GameSessionService;
use crate::application::use_cases::GetGameStatisticsUseCase;
use crate::infrastructure::driven_adapters::config::AppConfig;
use crate::infrastructure::driven_adapters::ConnectionRegistry;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub get_game_statistics_use_case: Arc<GetGameStatisticsUseCase>,
    pub game_session_service: Arc<GameSessionService>,
    pub connections: Arc<ConnectionRegistry>,
}
