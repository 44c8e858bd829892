//! AI Opponent
//!
//! Fleet placement and strike selection for the computer player. The
//! random source is passed in so games can use `thread_rng` and tests a
//! seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;

use super::game_rules::{is_position_used, is_valid_fleet};
use crate::domain::models::board::{Coordinate, Ship, Strike, BOARD_SIZE, FLEET_SHIP_LENGTHS};

/// Free cells wanted in every direction around the opening strike
const OPENING_SPACE: [usize; 2] = [3, 1];

const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Place a complete fleet at random
pub fn random_fleet<R: Rng + ?Sized>(rng: &mut R) -> Vec<Ship> {
    loop {
        let mut ships: Vec<Ship> = Vec::with_capacity(FLEET_SHIP_LENGTHS.len());
        for (index, length) in FLEET_SHIP_LENGTHS.into_iter().enumerate() {
            let ship = loop {
                let candidate = random_placement(rng, index, length);
                let overlaps = candidate.as_ref().map_or(true, |candidate| {
                    candidate
                        .coordinates()
                        .iter()
                        .any(|c| ships.iter().any(|ship| ship.occupies(*c)))
                });
                if let (Some(candidate), false) = (candidate, overlaps) {
                    break candidate;
                }
            };
            ships.push(ship);
        }
        if is_valid_fleet(&ships) {
            return ships;
        }
    }
}

fn random_placement<R: Rng + ?Sized>(rng: &mut R, index: usize, length: usize) -> Option<Ship> {
    let horizontal = rng.gen_bool(0.5);
    let span = i32::from(BOARD_SIZE) - i32::try_from(length).ok()?;
    let (row_bound, column_bound) = if horizontal {
        (i32::from(BOARD_SIZE) - 1, span)
    } else {
        (span, i32::from(BOARD_SIZE) - 1)
    };
    let row = rng.gen_range(0..=row_bound);
    let column = rng.gen_range(0..=column_bound);
    Ship::place(index.to_string(), row, column, length, horizontal)
}

/// Pick the next cell to strike.
///
/// `strikes` are the AI's own strikes, `sunken_ships` and `active_ships`
/// the opponent's fleet. Returns `None` only when every cell was struck.
pub fn next_strike<R: Rng + ?Sized>(
    rng: &mut R,
    strikes: &[Strike],
    sunken_ships: &[Ship],
    active_ships: &[Ship],
) -> Option<Coordinate> {
    if strikes.is_empty() {
        return opening_strike(rng, strikes);
    }

    let hits = open_hits(strikes, sunken_ships);
    if hits.len() > 1 {
        if let Some(coordinate) = extend_connected_hits(strikes, &hits) {
            return Some(coordinate);
        }
    }
    if let Some(coordinate) = next_to_hit(rng, strikes, &hits) {
        return Some(coordinate);
    }

    let largest = active_ships.iter().map(Ship::length).max().unwrap_or(0);
    let roomy: Vec<Coordinate> = open_cells(strikes)
        .filter(|c| has_room_for(*c, strikes, largest))
        .collect();
    roomy
        .choose(rng)
        .copied()
        .or_else(|| random_open_cell(rng, strikes))
}

fn opening_strike<R: Rng + ?Sized>(rng: &mut R, strikes: &[Strike]) -> Option<Coordinate> {
    for space in OPENING_SPACE {
        let candidates: Vec<Coordinate> = open_cells(strikes)
            .filter(|c| {
                DIRECTIONS
                    .iter()
                    .all(|(rows, columns)| free_run(strikes, c.offset(*rows, *columns), *rows, *columns, space) >= space)
            })
            .collect();
        if let Some(coordinate) = candidates.choose(rng) {
            return Some(*coordinate);
        }
    }
    random_open_cell(rng, strikes)
}

fn random_open_cell<R: Rng + ?Sized>(rng: &mut R, strikes: &[Strike]) -> Option<Coordinate> {
    let cells: Vec<Coordinate> = open_cells(strikes).collect();
    cells.choose(rng).copied()
}

fn open_cells(strikes: &[Strike]) -> impl Iterator<Item = Coordinate> + '_ {
    Coordinate::all().filter(|c| !is_position_used(*c, strikes))
}

/// Hits that are not part of a ship already sunk
fn open_hits(strikes: &[Strike], sunken_ships: &[Ship]) -> Vec<Coordinate> {
    strikes
        .iter()
        .filter(|s| s.is_hit())
        .map(Strike::coordinate)
        .filter(|c| !sunken_ships.iter().any(|ship| ship.occupies(*c)))
        .collect()
}

fn is_open(coordinate: Option<Coordinate>, strikes: &[Strike]) -> Option<Coordinate> {
    coordinate.filter(|c| !is_position_used(*c, strikes))
}

/// Continue a line of two adjacent hits, right or down first, then left or up
fn extend_connected_hits(strikes: &[Strike], hits: &[Coordinate]) -> Option<Coordinate> {
    for (i, first) in hits.iter().enumerate() {
        for second in &hits[i + 1..] {
            let (low, high) = if first < second { (first, second) } else { (second, first) };

            if low.row() == high.row() && high.column() == low.column() + 1 {
                if let Some(c) = is_open(high.offset(0, 1), strikes).or_else(|| is_open(low.offset(0, -1), strikes)) {
                    return Some(c);
                }
            }
            if low.column() == high.column() && high.row() == low.row() + 1 {
                if let Some(c) = is_open(high.offset(1, 0), strikes).or_else(|| is_open(low.offset(-1, 0), strikes)) {
                    return Some(c);
                }
            }
        }
    }
    None
}

/// An open neighbour of a hit, directions tried in random order
fn next_to_hit<R: Rng + ?Sized>(rng: &mut R, strikes: &[Strike], hits: &[Coordinate]) -> Option<Coordinate> {
    for hit in hits {
        let mut directions = DIRECTIONS;
        directions.shuffle(rng);
        if let Some(c) = directions
            .iter()
            .find_map(|(rows, columns)| is_open(hit.offset(*rows, *columns), strikes))
        {
            return Some(c);
        }
    }
    None
}

/// Count open cells from `start` stepping in one direction, stopping at `limit`
fn free_run(strikes: &[Strike], start: Option<Coordinate>, rows: i32, columns: i32, limit: usize) -> usize {
    let mut count = 0;
    let mut cell = start;
    while let Some(current) = is_open(cell, strikes) {
        if count == limit {
            break;
        }
        count += 1;
        cell = current.offset(rows, columns);
    }
    count
}

/// Whether a ship of `length` could still lie across the cell horizontally
/// or vertically
fn has_room_for(coordinate: Coordinate, strikes: &[Strike], length: usize) -> bool {
    [(0, 1), (1, 0)].into_iter().any(|(rows, columns)| {
        let forward = free_run(strikes, Some(coordinate), rows, columns, length);
        let backward = free_run(strikes, coordinate.offset(-rows, -columns), -rows, -columns, length);
        forward + backward >= length
    })
}
