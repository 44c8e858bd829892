//! API Middleware

pub mod origin;

pub use origin::require_allowed_origin;
