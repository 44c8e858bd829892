//! Common test utilities for e2e tests
//!
//! Provides test infrastructure for spinning up a MariaDB container,
//! running migrations, creating a test application and talking to it
//! over WebSocket.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mariadb::Mariadb;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use battleship_backend::application::services::GameSessionService;
use battleship_backend::application::use_cases::GetGameStatisticsUseCase;
use battleship_backend::infrastructure::driven_adapters::config::AppConfig;
use battleship_backend::infrastructure::driven_adapters::{ConnectionRegistry, MariaDbGameStatisticsRepository};
use battleship_backend::infrastructure::driving_adapters::api_rest::AppState;
use battleship_backend::infrastructure::driving_adapters::build_router;

/// Origin allowed by the test configuration
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// How long a test waits for a frame before failing
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub pool: MySqlPool,
    pub state: AppState,
    _container: ContainerAsync<Mariadb>,
}

impl TestApp {
    /// Create a new test application with a fresh MariaDB database
    pub async fn new() -> Self {
        Self::with_idle_timeout(600).await
    }

    /// Same as [`TestApp::new`], closing connections idle for `idle_timeout_secs`
    pub async fn with_idle_timeout(idle_timeout_secs: u64) -> Self {
        // Start MariaDB container
        let container = Mariadb::default()
            .start()
            .await
            .expect("Failed to start MariaDB container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get port");

        let database_url = format!("mysql://root@{}:{}/test", host, port);

        // Create connection pool
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = create_test_config(idle_timeout_secs);
        let statistics_repository = Arc::new(MariaDbGameStatisticsRepository::new(pool.clone()));
        let connections = Arc::new(ConnectionRegistry::new());

        let state = AppState {
            get_game_statistics_use_case: Arc::new(GetGameStatisticsUseCase::new(statistics_repository.clone())),
            game_session_service: Arc::new(GameSessionService::new(
                connections.clone(),
                statistics_repository,
                config.game.settings(),
            )),
            connections,
            config: Arc::new(config),
        };

        let router = build_router(state.clone());

        Self {
            router,
            pool,
            state,
            _container: container,
        }
    }

    /// Serve the application on a random local port
    pub async fn spawn_server(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read listener address");
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });

        addr
    }

    /// Clear all data from the database (useful between tests)
    pub async fn clear_database(&self) {
        sqlx::query("DELETE FROM game_statistics")
            .execute(&self.pool)
            .await
            .expect("Failed to clear game_statistics table");
    }
}

/// Create a test configuration
fn create_test_config(idle_timeout_secs: u64) -> AppConfig {
    use config::{Config, File, FileFormat};

    let config_str = format!(
        r#"
[server]
host = "127.0.0.1"
port = 0
allowed_origins = ["{ALLOWED_ORIGIN}"]

[database]
url = "mysql://root@localhost/test"
max_connections = 5
min_connections = 1

[game]
turn_timeout_secs = 120
ai_response_delay_secs = 0
ai_reconnect_grace_secs = 1
idle_timeout_secs = {idle_timeout_secs}
"#
    );

    Config::builder()
        .add_source(File::from_str(&config_str, FileFormat::Toml))
        .build()
        .expect("Failed to build test config")
        .try_deserialize()
        .expect("Failed to deserialize test config")
}

/// Open a game connection with the given `Origin` header
pub async fn connect_with_origin(
    addr: SocketAddr,
    origin: &str,
) -> Result<Client, tokio_tungstenite::tungstenite::Error> {
    let mut request = format!("ws://{addr}/play")
        .into_client_request()
        .expect("Failed to build WebSocket request");
    request
        .headers_mut()
        .insert("Origin", HeaderValue::from_str(origin).expect("valid origin header"));

    let (client, _response) = tokio_tungstenite::connect_async(request).await?;
    Ok(client)
}

/// Open a game connection from the allowed origin
pub async fn connect(addr: SocketAddr) -> Client {
    connect_with_origin(addr, ALLOWED_ORIGIN)
        .await
        .expect("Failed to open WebSocket connection")
}

/// Send a JSON command
pub async fn send(client: &mut Client, command: Value) {
    client
        .send(Message::Text(command.to_string()))
        .await
        .expect("Failed to send command");
}

/// Next frame from the server, skipping pings
pub async fn next_message(client: &mut Client) -> Option<Message> {
    loop {
        let message = tokio::time::timeout(RECEIVE_TIMEOUT, client.next())
            .await
            .expect("Timed out waiting for a message");
        match message {
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(message)) => return Some(message),
            Some(Err(_)) | None => return None,
        }
    }
}

/// Next text frame from the server
pub async fn next_text(client: &mut Client) -> String {
    match next_message(client).await {
        Some(Message::Text(text)) => text,
        other => panic!("expected a text frame, got {other:?}"),
    }
}

/// Next game event from the server
pub async fn next_event(client: &mut Client) -> Value {
    let text = next_text(client).await;
    serde_json::from_str(&text).unwrap_or_else(|_| panic!("expected a game event, got {text:?}"))
}

/// Assert the server closes the connection
pub async fn expect_closed(client: &mut Client) {
    match next_message(client).await {
        Some(Message::Close(_)) | None => {}
        other => panic!("expected the connection to close, got {other:?}"),
    }
}

/// A valid fleet: one ship per row, starting in the first column
pub fn fleet() -> Value {
    json!([
        { "id": "0", "isHorizontal": true, "length": 5, "row": 0, "column": 0 },
        { "id": "1", "isHorizontal": true, "length": 4, "row": 1, "column": 0 },
        { "id": "2", "isHorizontal": true, "length": 3, "row": 2, "column": 0 },
        { "id": "3", "isHorizontal": true, "length": 3, "row": 3, "column": 0 },
        { "id": "4", "isHorizontal": true, "length": 2, "row": 4, "column": 0 }
    ])
}

/// Statistics response structure for deserialization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatisticsResponse {
    pub pvp_games_total: i64,
    pub pvp_games_completed: i64,
    pub pvp_hits: i64,
    pub pvp_misses: i64,
    pub pvp_ships_sunk: i64,
    pub ai_games_total: i64,
    pub ai_games_completed: i64,
    pub ai_games_won: i64,
    pub ai_player_hits: i64,
    pub ai_player_misses: i64,
    pub ai_player_ships_sunk: i64,
    pub ai_opponent_hits: i64,
    pub ai_opponent_misses: i64,
    pub ai_opponent_ships_sunk: i64,
}

/// Error response structure for deserialization
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
