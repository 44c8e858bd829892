//! Application Services
//!
//! Long-lived services holding in-memory state.

mod game_events;
mod game_session_service;

pub use game_session_service::{GameSessionService, GameSettings};
