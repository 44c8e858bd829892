//! Origin Check Middleware
//!
//! Refuses requests whose `Origin` header is missing or not in the
//! configured list, so only the known game clients open game connections.

use axum::{
    extract::{Request, State},
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::ApiError;

/// Reject requests whose origin is missing or not in `server.allowed_origins`
pub async fn require_allowed_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let origin = request.headers().get(ORIGIN).and_then(|value| value.to_str().ok());

    match origin {
        Some(origin) if is_allowed(&state.config.server.allowed_origins, origin) => Ok(next.run(request).await),
        Some(origin) => {
            tracing::warn!(origin = %origin, "Request from forbidden origin");
            Err(ApiError::ForbiddenOrigin(origin.to_string()))
        }
        None => {
            tracing::warn!("Request without a readable origin");
            Err(ApiError::ForbiddenOrigin(String::new()))
        }
    }
}

fn is_allowed(allowed_origins: &[String], origin: &str) -> bool {
    allowed_origins.iter().any(|allowed| allowed == origin)
}
