//! WebSocket Game Endpoint
//!
//! Players connect to `/play`, send JSON game commands and receive game
//! events. Each connection gets a bounded outgoing queue drained by its own
//! forwarder task.

pub mod dto;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc::{self, Receiver};

use crate::application::services::GameSessionService;
use crate::domain::gateways::PlayerNotifier;
use crate::domain::models::ids::ConnectionId;
use crate::infrastructure::driven_adapters::OutgoingMessage;
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::GameError;

use dto::{GameCommandDto, GameCommandType};

/// Size of each connection's outgoing queue
const OUTGOING_QUEUE_SIZE: usize = 100;

/// Create the router for the game endpoint
pub fn router() -> Router<AppState> {
    Router::new().route("/play", get(ws_handler))
}

/// GET /play - Upgrade to a game connection
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection = ConnectionId::new();
    let (sink, stream) = socket.split();
    let (sender, receiver) = mpsc::channel::<OutgoingMessage>(OUTGOING_QUEUE_SIZE);

    state.connections.add(connection, sender);
    tracing::info!(connection_id = %connection, "Player connected");

    let mut sender_task = tokio::spawn(forwarder(sink, receiver));
    let idle_timeout = state.config.game.idle_timeout();
    let receiver_task = read_commands(&state, connection, stream, idle_timeout);
    tokio::pin!(receiver_task);

    let forwarder_finished = tokio::select! {
        res = &mut sender_task => {
            if let Err(error) = res {
                tracing::error!(connection_id = %connection, error = %error, "Forwarder task failed");
            }
            true
        }
        () = &mut receiver_task => false,
    };

    // A command still being handled must finish; the peer answers the close frame
    if forwarder_finished {
        receiver_task.await;
    }
    tracing::debug!(connection_id = %connection, "Stopped reading from connection");

    // Dropping the last sender lets the forwarder flush what is queued and stop
    state.connections.remove(&connection);
    state.game_session_service.connection_closed(connection).await;
    tracing::info!(connection_id = %connection, "Player disconnected");
}

async fn read_commands(
    state: &AppState,
    connection: ConnectionId,
    mut stream: SplitStream<WebSocket>,
    idle_timeout: Duration,
) {
    loop {
        let message = match tokio::time::timeout(idle_timeout, stream.next()).await {
            Ok(Some(Ok(message))) => message,
            Ok(Some(Err(error))) => {
                tracing::debug!(connection_id = %connection, error = %error, "WebSocket error");
                return;
            }
            Ok(None) => return,
            Err(_) => {
                tracing::info!(connection_id = %connection, "Closing idle connection");
                state.connections.close(&connection);
                return;
            }
        };

        match message {
            Message::Text(text) => match serde_json::from_str::<GameCommandDto>(&text) {
                Ok(command) => handle_command(&state.game_session_service, connection, command).await,
                Err(error) => {
                    tracing::warn!(connection_id = %connection, error = %error, "Unreadable game command");
                    state.game_session_service.reject(connection, GameError::UnreadableCommand);
                }
            },
            Message::Close(_) => return,
            _ => {}
        }
    }
}

/// Hand a player command to the game engine
async fn handle_command(service: &Arc<GameSessionService>, connection: ConnectionId, command: GameCommandDto) {
    tracing::debug!(connection_id = %connection, command = ?command.command_type, "Game command received");

    let game_id = command.game_id.as_deref();
    match command.command_type {
        GameCommandType::Join => service.join(connection, command.ships()).await,
        GameCommandType::JoinFriend => service.join_friend(connection, game_id, command.ships()).await,
        GameCommandType::JoinAi => service.join_ai(connection, command.ships()).await,
        GameCommandType::Reconnect => service.reconnect(connection, game_id).await,
        GameCommandType::Leave => service.leave(connection, game_id).await,
        GameCommandType::Strike => {
            service
                .strike(connection, game_id, command.strike_row, command.strike_column)
                .await;
        }
    }
}

/// Write queued messages to the socket until a close frame is sent.
/// A queue closed by the registry ends with a close frame as well.
async fn forwarder(mut sink: SplitSink<WebSocket, Message>, mut receiver: Receiver<OutgoingMessage>) {
    while let Some(message) = receiver.recv().await {
        let closing = message == OutgoingMessage::Close;
        if let Err(error) = sink.send(message.into()).await {
            tracing::warn!(error = %error, "Failed to send message to WebSocket, client likely disconnected");
            return;
        }
        if closing {
            return;
        }
    }

    if let Err(error) = sink.send(OutgoingMessage::Close.into()).await {
        tracing::debug!(error = %error, "Connection already closed");
    }
}

impl From<OutgoingMessage> for Message {
    fn from(message: OutgoingMessage) -> Self {
        match message {
            OutgoingMessage::Text(text) => Message::Text(text),
            OutgoingMessage::Close => Message::Close(Some(CloseFrame {
                code: close_code::NORMAL,
                reason: "".into(),
            })),
        }
    }
}
