//! Battleship Game Backend
//!
//! Multiplayer Battleship server: players meet over WebSocket in random,
//! friend or AI games, and finished games are added to statistics kept in
//! MariaDB. Follows Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
