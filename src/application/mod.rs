//! Application Layer
//!
//! Contains use cases and the game session service that orchestrate the
//! domain logic. They depend on domain gateways (abstractions), not
//! concrete implementations.

pub mod services;
pub mod use_cases;
