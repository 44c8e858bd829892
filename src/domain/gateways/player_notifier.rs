//! Player Notifier Gateway
//!
//! Outbound channel to connected players. Implementations must not block:
//! the game engine calls these while deciding what to send next.

use crate::domain::models::game_event::GameEvent;
use crate::domain::models::ids::ConnectionId;

pub trait PlayerNotifier: Send + Sync {
    /// Queue a game event for the connection
    fn send_event(&self, connection: &ConnectionId, event: &GameEvent);

    /// Queue a plain text message for the connection
    fn send_text(&self, connection: &ConnectionId, text: &str);

    /// Close the connection once everything queued before has been sent
    fn close(&self, connection: &ConnectionId);
}
