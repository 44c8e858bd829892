//! Domain Services
//!
//! Stateless game logic: fleet and strike rules and the AI opponent.

pub mod ai_opponent;
pub mod game_rules;
