//! Game Wire DTOs
//!
//! JSON commands received from and events sent to players.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::board::{Coordinate, Ship, Strike, BOARD_SIZE};
use crate::domain::models::game_event::GameEvent;

/// Kind of command a player sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameCommandType {
    Join,
    JoinFriend,
    JoinAi,
    Reconnect,
    Leave,
    Strike,
}

/// Command received from a player
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCommandDto {
    #[serde(rename = "type")]
    pub command_type: GameCommandType,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub strike_row: Option<i32>,
    #[serde(default)]
    pub strike_column: Option<i32>,
    #[serde(default)]
    pub ships: Option<Vec<ShipDto>>,
}

impl GameCommandDto {
    /// Ships of the command; ships that don't fit on the board are left out
    #[must_use]
    pub fn ships(&self) -> Vec<Ship> {
        self.ships
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(index, dto)| dto.to_ship(index))
            .collect()
    }
}

/// A ship given by its top-left cell, direction and length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub is_horizontal: bool,

    #[validate(range(min = 1, max = 10, message = "length must be between 1 and 10"))]
    pub length: i32,

    #[validate(range(min = 0, max = 9, message = "row must be between 0 and 9"))]
    pub row: i32,

    #[serde(alias = "col")]
    #[validate(range(min = 0, max = 9, message = "column must be between 0 and 9"))]
    pub column: i32,
}

impl ShipDto {
    /// Convert to a domain ship, `None` if the ship is not on the board
    #[must_use]
    pub fn to_ship(&self, index: usize) -> Option<Ship> {
        self.validate().ok()?;
        let id = self.id.clone().unwrap_or_else(|| index.to_string());
        let length = usize::try_from(self.length).ok()?;
        Ship::place(id, self.row, self.column, length, self.is_horizontal)
    }
}

impl From<&Ship> for ShipDto {
    fn from(ship: &Ship) -> Self {
        let origin = ship.origin();
        Self {
            id: Some(ship.id().to_string()),
            is_horizontal: ship.is_horizontal(),
            length: i32::try_from(ship.length()).unwrap_or(i32::from(BOARD_SIZE)),
            row: origin.map_or(0, |c| i32::from(c.row())),
            column: origin.map_or(0, |c| i32::from(c.column())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateDto {
    pub row: u8,
    pub column: u8,
}

impl From<Coordinate> for CoordinateDto {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            row: coordinate.row(),
            column: coordinate.column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrikeDto {
    pub coordinate: CoordinateDto,
    pub hit: bool,
}

impl From<&Strike> for StrikeDto {
    fn from(strike: &Strike) -> Self {
        Self {
            coordinate: strike.coordinate().into(),
            hit: strike.is_hit(),
        }
    }
}

/// Event sent to a player; absent fields are left out of the JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEventDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_strikes: Option<Vec<StrikeDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_strikes: Option<Vec<StrikeDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_active_ships: Option<Vec<ShipDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_sunken_ships: Option<Vec<ShipDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_sunken_ships: Option<Vec<ShipDto>>,
}

fn strikes(strikes: Option<&Vec<Strike>>) -> Option<Vec<StrikeDto>> {
    strikes.map(|strikes| strikes.iter().map(StrikeDto::from).collect())
}

fn ships(ships: Option<&Vec<Ship>>) -> Option<Vec<ShipDto>> {
    ships.map(|ships| ships.iter().map(ShipDto::from).collect())
}

impl From<&GameEvent> for GameEventDto {
    fn from(event: &GameEvent) -> Self {
        Self {
            game_id: event.game_id.map(|id| id.to_string()),
            event_type: event.event_type.map(|t| t.as_str()),
            own_strikes: strikes(event.own_strikes.as_ref()),
            opponent_strikes: strikes(event.opponent_strikes.as_ref()),
            time_left: event.time_left,
            own_active_ships: ships(event.own_active_ships.as_ref()),
            own_sunken_ships: ships(event.own_sunken_ships.as_ref()),
            opponent_sunken_ships: ships(event.opponent_sunken_ships.as_ref()),
        }
    }
}
