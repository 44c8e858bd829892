//! Error Types
//!
//! Game rejections with their player-facing text, and data access / HTTP
//! errors with proper status code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::domain::models::game_event::GameEventType;

/// Rejections of a player command.
///
/// The `Display` text is sent verbatim to the player unless the error is
/// answered with an event (see [`GameError::event_type`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game id is not valid.")]
    InvalidGameId,

    #[error("Can't join a game when already in one")]
    AlreadyInGame,

    #[error("Can't join a game without correct setup of ships.")]
    InvalidShips,

    #[error("Game with that id does not exist")]
    GameNotFound,

    #[error("No game to reconnect to")]
    NoGame,

    #[error("No friend game to join with that id")]
    WrongGameId,

    #[error("Both players for this game are already active")]
    BothPlayersActive,

    #[error("Row and/or column values are missing")]
    MissingCoordinates,

    #[error("Row and/or column values are not valid")]
    InvalidCoordinates,

    #[error("Wrong session for this game")]
    WrongSession,

    #[error("Game has not started yet")]
    GameNotStarted,

    #[error("Not your turn to play")]
    NotYourTurn,

    #[error("Can't hit same position twice")]
    PositionAlreadyUsed,

    #[error("Could not handle game command")]
    UnreadableCommand,
}

impl GameError {
    /// Event sent instead of the plain text message, if any
    #[must_use]
    pub fn event_type(&self) -> Option<GameEventType> {
        match self {
            Self::NoGame => Some(GameEventType::NoGame),
            Self::WrongGameId => Some(GameEventType::WrongGameId),
            _ => None,
        }
    }

    /// Whether the connection is closed after the rejection
    #[must_use]
    pub fn closes_connection(&self) -> bool {
        matches!(self, Self::NoGame)
    }
}

/// Repository-level errors for data access failures
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Use case-level errors for application logic failures
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl UseCaseError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "INTERNAL_ERROR",
        }
    }
}

/// API error response for HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UseCase(#[from] UseCaseError),

    #[error("Origin not allowed: {0}")]
    ForbiddenOrigin(String),
}

/// Error response body structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::UseCase(uc_error) => {
                // Internal details stay in the logs
                tracing::error!(error = %uc_error, "Use case failed");
                (
                    uc_error.status_code(),
                    uc_error.error_code().to_string(),
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::ForbiddenOrigin(_) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN".to_string(),
                "Invalid Origin: Access Denied".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message },
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}
