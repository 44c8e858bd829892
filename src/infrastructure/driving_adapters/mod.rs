//! Driving Adapters
//!
//! Entry points that drive the application:
//! - HTTP REST API handlers
//! - WebSocket game endpoint
//! - DTOs for request/response

pub mod api_rest;
pub mod websocket;

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use api_rest::handlers::game;
use api_rest::middleware::require_allowed_origin;
use api_rest::AppState;

/// How long browsers may cache a CORS preflight answer
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the application router with all routes and layers
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);
    let play = websocket::router().route_layer(middleware::from_fn_with_state(state.clone(), require_allowed_origin));

    Router::new()
        .merge(game::router())
        .merge(play)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
