//! Game Rules
//!
//! Checks applied to fleets and strikes before they reach a game session.

use std::collections::HashSet;

use crate::domain::models::board::{Coordinate, Ship, Strike, FLEET_SHIP_LENGTHS};

/// A fleet is valid when it holds exactly one ship of each fleet length,
/// every ship is a straight run of cells and no two ships share a cell
#[must_use]
pub fn is_valid_fleet(ships: &[Ship]) -> bool {
    if ships.len() != FLEET_SHIP_LENGTHS.len() {
        return false;
    }

    let mut lengths: Vec<usize> = ships.iter().map(Ship::length).collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    if lengths != FLEET_SHIP_LENGTHS {
        return false;
    }

    if !ships.iter().all(is_straight) {
        return false;
    }

    let mut occupied = HashSet::new();
    ships
        .iter()
        .flat_map(Ship::coordinates)
        .all(|coordinate| occupied.insert(*coordinate))
}

/// Whether the ship's cells form one contiguous horizontal or vertical line
#[must_use]
pub fn is_straight(ship: &Ship) -> bool {
    let mut cells = ship.coordinates().to_vec();
    cells.sort_unstable();
    let horizontal = ship.is_horizontal();

    cells.windows(2).all(|pair| {
        let (a, b) = (pair[0], pair[1]);
        if horizontal {
            a.row() == b.row() && b.column() == a.column() + 1
        } else {
            a.column() == b.column() && b.row() == a.row() + 1
        }
    })
}

/// Whether a strike was already made on the cell
#[must_use]
pub fn is_position_used(coordinate: Coordinate, strikes: &[Strike]) -> bool {
    strikes.iter().any(|strike| strike.coordinate() == coordinate)
}
