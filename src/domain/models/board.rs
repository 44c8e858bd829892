//! Board Domain Model
//!
//! Coordinates on the 10x10 board, ships and strikes.

/// Number of rows and columns on the board
pub const BOARD_SIZE: u8 = 10;

/// Ship lengths of a complete fleet
pub const FLEET_SHIP_LENGTHS: [usize; 5] = [5, 4, 3, 3, 2];

/// A cell on the board; construction guarantees it lies within the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    row: u8,
    column: u8,
}

impl Coordinate {
    /// Create a coordinate, `None` if it is off the board
    #[must_use]
    pub fn new(row: i32, column: i32) -> Option<Self> {
        let on_board = |value: i32| u8::try_from(value).ok().filter(|v| *v < BOARD_SIZE);
        Some(Self {
            row: on_board(row)?,
            column: on_board(column)?,
        })
    }

    #[must_use]
    pub fn row(&self) -> u8 {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> u8 {
        self.column
    }

    /// The coordinate shifted by the given amount, `None` if it leaves the board
    #[must_use]
    pub fn offset(&self, rows: i32, columns: i32) -> Option<Self> {
        Self::new(i32::from(self.row) + rows, i32::from(self.column) + columns)
    }

    /// Every cell of the board, row by row
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |column| Coordinate { row, column }))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A strike made by a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    coordinate: Coordinate,
    hit: bool,
}

impl Strike {
    #[must_use]
    pub fn new(coordinate: Coordinate, hit: bool) -> Self {
        Self { coordinate, hit }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

/// A ship occupying a straight run of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    id: String,
    coordinates: Vec<Coordinate>,
}

impl Ship {
    #[must_use]
    pub fn new(id: impl Into<String>, coordinates: Vec<Coordinate>) -> Self {
        Self {
            id: id.into(),
            coordinates,
        }
    }

    /// Place a ship from its top-left cell, `None` if any cell is off the board
    #[must_use]
    pub fn place(id: impl Into<String>, row: i32, column: i32, length: usize, horizontal: bool) -> Option<Self> {
        if length == 0 {
            return None;
        }
        let coordinates = (0..i32::try_from(length).ok()?)
            .map(|i| {
                if horizontal {
                    Coordinate::new(row, column + i)
                } else {
                    Coordinate::new(row + i, column)
                }
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(id, coordinates))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.coordinates.len()
    }

    #[must_use]
    pub fn occupies(&self, coordinate: Coordinate) -> bool {
        self.coordinates.contains(&coordinate)
    }

    /// A ship lying in a single row counts as horizontal
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.coordinates
            .first()
            .is_some_and(|first| self.coordinates.iter().all(|c| c.row() == first.row()))
    }

    /// Top-left cell of the ship
    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.coordinates.iter().min().copied()
    }

    /// Whether every cell of the ship has been hit by the given strikes
    #[must_use]
    pub fn is_sunk_by(&self, strikes: &[Strike]) -> bool {
        self.coordinates
            .iter()
            .all(|c| strikes.iter().any(|s| s.is_hit() && s.coordinate() == *c))
    }
}
