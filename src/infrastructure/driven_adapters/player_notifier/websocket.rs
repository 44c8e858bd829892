//! WebSocket Connection Registry
//!
//! Keeps the outgoing queue of every open player connection. Messages are
//! queued without waiting; each connection's forwarder task writes them to
//! the socket. A connection whose queue is full is dropped from the registry,
//! which closes its queue and makes the forwarder close the socket.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender;

use crate::domain::gateways::PlayerNotifier;
use crate::domain::models::game_event::GameEvent;
use crate::domain::models::ids::ConnectionId;
use crate::infrastructure::driving_adapters::websocket::dto::GameEventDto;

/// Frame queued for a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Text(String),
    Close,
}

/// Registry of open player connections
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Sender<OutgoingMessage>>>,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, connection: ConnectionId, sender: Sender<OutgoingMessage>) {
        self.lock().insert(connection, sender);
    }

    pub fn remove(&self, connection: &ConnectionId) {
        self.lock().remove(connection);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ConnectionId, Sender<OutgoingMessage>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, connection: &ConnectionId, message: OutgoingMessage) {
        let Some(sender) = self.lock().get(connection).cloned() else {
            tracing::debug!(connection_id = %connection, "Connection already gone, message dropped");
            return;
        };

        match sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %connection, "Outgoing queue full, closing connection");
                self.remove(connection);
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(connection_id = %connection, "Connection closed, message dropped");
            }
        }
    }
}

impl PlayerNotifier for ConnectionRegistry {
    fn send_event(&self, connection: &ConnectionId, event: &GameEvent) {
        match serde_json::to_string(&GameEventDto::from(event)) {
            Ok(json) => self.push(connection, OutgoingMessage::Text(json)),
            Err(error) => {
                tracing::error!(connection_id = %connection, error = %error, "Failed to serialize game event");
            }
        }
    }

    fn send_text(&self, connection: &ConnectionId, text: &str) {
        self.push(connection, OutgoingMessage::Text(text.to_string()));
    }

    fn close(&self, connection: &ConnectionId) {
        self.push(connection, OutgoingMessage::Close);
    }
}
