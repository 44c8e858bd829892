//! Identifiers
//!
//! Newtype wrappers for game and connection ids.

use uuid::Uuid;

/// Newtype wrapper for Game ID providing type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(Uuid);

impl GameId {
    /// Create a new random GameId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a game id sent by a player; only the hyphenated form is accepted
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let uuid = Uuid::try_parse(value).ok()?;
        uuid.hyphenated()
            .to_string()
            .eq_ignore_ascii_case(value)
            .then_some(Self(uuid))
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one WebSocket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
