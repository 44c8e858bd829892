//! Player Notifier Implementations

mod websocket;

pub use websocket::{ConnectionRegistry, OutgoingMessage};
