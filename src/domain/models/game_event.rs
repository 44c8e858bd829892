//! Game Event Domain Model
//!
//! What a player is told about the game after a command or timer.

use super::board::{Ship, Strike};
use super::ids::GameId;

/// Kind of game event sent to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEventType {
    WaitingOpponent,
    WaitingFriend,
    TurnOwn,
    TurnOpponent,
    Won,
    Lost,
    OpponentLeft,
    TimeoutOwn,
    TimeoutOpponent,
    NoGame,
    WrongGameId,
}

impl GameEventType {
    /// Wire name of the event type
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingOpponent => "WAITING_OPPONENT",
            Self::WaitingFriend => "WAITING_FRIEND",
            Self::TurnOwn => "TURN_OWN",
            Self::TurnOpponent => "TURN_OPPONENT",
            Self::Won => "WON",
            Self::Lost => "LOST",
            Self::OpponentLeft => "OPPONENT_LEFT",
            Self::TimeoutOwn => "TIMEOUT_OWN",
            Self::TimeoutOpponent => "TIMEOUT_OPPONENT",
            Self::NoGame => "NO_GAME",
            Self::WrongGameId => "WRONG_GAME_ID",
        }
    }
}

impl std::fmt::Display for GameEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A game event; fields left as `None` are not sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameEvent {
    pub game_id: Option<GameId>,
    pub event_type: Option<GameEventType>,
    pub own_strikes: Option<Vec<Strike>>,
    pub opponent_strikes: Option<Vec<Strike>>,
    pub time_left: Option<u64>,
    pub own_active_ships: Option<Vec<Ship>>,
    pub own_sunken_ships: Option<Vec<Ship>>,
    pub opponent_sunken_ships: Option<Vec<Ship>>,
}

impl GameEvent {
    /// Event carrying only its type
    #[must_use]
    pub fn of(event_type: GameEventType) -> Self {
        Self {
            event_type: Some(event_type),
            ..Self::default()
        }
    }

    /// Event without any content, sent to a player before closing the connection
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_game_id(self, game_id: GameId) -> Self {
        Self {
            game_id: Some(game_id),
            ..self
        }
    }

    #[must_use]
    pub fn with_time_left(self, seconds: u64) -> Self {
        Self {
            time_left: Some(seconds),
            ..self
        }
    }

    #[must_use]
    pub fn with_own_strikes(self, strikes: &[Strike]) -> Self {
        Self {
            own_strikes: Some(strikes.to_vec()),
            ..self
        }
    }

    #[must_use]
    pub fn with_opponent_strikes(self, strikes: &[Strike]) -> Self {
        Self {
            opponent_strikes: Some(strikes.to_vec()),
            ..self
        }
    }

    #[must_use]
    pub fn with_own_active_ships(self, ships: &[Ship]) -> Self {
        Self {
            own_active_ships: Some(ships.to_vec()),
            ..self
        }
    }

    #[must_use]
    pub fn with_own_sunken_ships(self, ships: &[Ship]) -> Self {
        Self {
            own_sunken_ships: Some(ships.to_vec()),
            ..self
        }
    }

    #[must_use]
    pub fn with_opponent_sunken_ships(self, ships: &[Ship]) -> Self {
        Self {
            opponent_sunken_ships: Some(ships.to_vec()),
            ..self
        }
    }
}
