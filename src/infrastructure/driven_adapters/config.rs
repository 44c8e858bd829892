//! Application Configuration
//!
//! Loads configuration from files and environment variables.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::application::services::GameSettings;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to open a game connection and call the HTTP API
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Game timing configuration, in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,
    #[serde(default = "default_ai_response_delay")]
    pub ai_response_delay_secs: u64,
    #[serde(default = "default_ai_reconnect_grace")]
    pub ai_reconnect_grace_secs: u64,
    /// A connection without any incoming frame for this long is closed
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_turn_timeout() -> u64 {
    120
}

fn default_ai_response_delay() -> u64 {
    2
}

fn default_ai_reconnect_grace() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_timeout_secs: default_turn_timeout(),
            ai_response_delay_secs: default_ai_response_delay(),
            ai_reconnect_grace_secs: default_ai_reconnect_grace(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            turn_timeout: Duration::from_secs(self.turn_timeout_secs),
            ai_response_delay: Duration::from_secs(self.ai_response_delay_secs),
            ai_reconnect_grace: Duration::from_secs(self.ai_reconnect_grace_secs),
        }
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "default".into());

        Config::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(true))
            // Merge environment-specific config if it exists
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Override with environment variables (e.g., APP__SERVER__PORT,
            // APP__SERVER__ALLOWED_ORIGINS=https://a.example,https://b.example)
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
