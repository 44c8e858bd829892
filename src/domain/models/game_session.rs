//! Game Session Domain Model
//!
//! One game between two players (or a player and the AI): seats, boards,
//! turn order and the turn clock.

use std::time::Duration;

use tokio::time::Instant;

use super::board::{Coordinate, Ship, Strike, FLEET_SHIP_LENGTHS};
use super::game_statistics::GameStatistics;
use super::ids::{ConnectionId, GameId};

/// One of the two seats in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// How the game was set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Paired with the next player asking for a random opponent
    Random,
    /// Joined by a friend who knows the game id
    Friend,
    /// Played against the computer, which holds seat two
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    WaitingOpponent,
    Turn(PlayerSlot),
}

/// Result of a single strike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    Miss,
    Hit,
    Sunk,
    /// The strike sank the opponent's last ship
    FleetDestroyed,
}

impl StrikeOutcome {
    #[must_use]
    pub fn sank_ship(self) -> bool {
        matches!(self, Self::Sunk | Self::FleetDestroyed)
    }
}

/// Everything the game knows about one seat
#[derive(Debug, Clone, Default)]
pub struct PlayerBoard {
    connection: Option<ConnectionId>,
    connected: bool,
    strikes: Vec<Strike>,
    active_ships: Vec<Ship>,
    sunken_ships: Vec<Ship>,
}

impl PlayerBoard {
    #[must_use]
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Strikes this player made on the opponent's board
    #[must_use]
    pub fn strikes(&self) -> &[Strike] {
        &self.strikes
    }

    #[must_use]
    pub fn active_ships(&self) -> &[Ship] {
        &self.active_ships
    }

    #[must_use]
    pub fn sunken_ships(&self) -> &[Ship] {
        &self.sunken_ships
    }

    fn is_seated(&self) -> bool {
        self.connection.is_some() || !self.active_ships.is_empty() || !self.sunken_ships.is_empty()
    }

    fn count_strikes(&self, hit: bool) -> i64 {
        let count = self.strikes.iter().filter(|s| s.is_hit() == hit).count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }
}

/// A game session held in memory for as long as the game runs
#[derive(Debug)]
pub struct GameSession {
    id: GameId,
    mode: GameMode,
    state: GameState,
    started: bool,
    players: [PlayerBoard; 2],
    turn_deadline: Option<Instant>,
    turn_generation: u64,
}

impl GameSession {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            id: GameId::new(),
            mode,
            state: GameState::WaitingOpponent,
            started: false,
            players: [PlayerBoard::default(), PlayerBoard::default()],
            turn_deadline: None,
            turn_generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_against_ai(&self) -> bool {
        self.mode == GameMode::Ai
    }

    #[must_use]
    pub fn player(&self, slot: PlayerSlot) -> &PlayerBoard {
        &self.players[slot.index()]
    }

    /// Seat a human player with their fleet
    pub fn seat_player(&mut self, slot: PlayerSlot, connection: ConnectionId, ships: Vec<Ship>) {
        let board = &mut self.players[slot.index()];
        board.connection = Some(connection);
        board.connected = true;
        board.active_ships = ships;
    }

    /// Give the computer its fleet in seat two
    pub fn seat_ai(&mut self, ships: Vec<Ship>) {
        self.players[PlayerSlot::Two.index()].active_ships = ships;
    }

    /// Whether a player looking for a game of this mode can take seat two
    #[must_use]
    pub fn is_open_for(&self, mode: GameMode) -> bool {
        self.mode == mode && !self.started && !self.player(PlayerSlot::Two).is_seated()
    }

    /// Seat held by the connection, if any
    #[must_use]
    pub fn slot_of(&self, connection: ConnectionId) -> Option<PlayerSlot> {
        [PlayerSlot::One, PlayerSlot::Two]
            .into_iter()
            .find(|slot| self.player(*slot).connection == Some(connection))
    }

    #[must_use]
    pub fn is_human(&self, slot: PlayerSlot) -> bool {
        !(self.is_against_ai() && slot == PlayerSlot::Two)
    }

    /// Connection of the seat if a human is connected to it
    #[must_use]
    pub fn connected_human(&self, slot: PlayerSlot) -> Option<ConnectionId> {
        let board = self.player(slot);
        if self.is_human(slot) && board.connected {
            board.connection
        } else {
            None
        }
    }

    pub fn mark_disconnected(&mut self, slot: PlayerSlot) {
        self.players[slot.index()].connected = false;
    }

    /// Take over the first seat whose human player has disconnected
    pub fn reconnect(&mut self, connection: ConnectionId) -> Option<PlayerSlot> {
        let slot = [PlayerSlot::One, PlayerSlot::Two].into_iter().find(|slot| {
            let board = self.player(*slot);
            self.is_human(*slot) && board.is_seated() && !board.connected
        })?;
        let board = &mut self.players[slot.index()];
        board.connection = Some(connection);
        board.connected = true;
        Some(slot)
    }

    /// Start the game with player one to move; returns the turn generation
    pub fn start(&mut self, now: Instant, turn_timeout: Duration) -> u64 {
        self.started = true;
        self.state = GameState::Turn(PlayerSlot::One);
        self.restart_turn_clock(now, turn_timeout)
    }

    #[must_use]
    pub fn is_turn_of(&self, slot: PlayerSlot) -> bool {
        self.state == GameState::Turn(slot)
    }

    #[must_use]
    pub fn has_struck(&self, slot: PlayerSlot, coordinate: Coordinate) -> bool {
        self.player(slot)
            .strikes
            .iter()
            .any(|s| s.coordinate() == coordinate)
    }

    /// Record a strike by `slot` on the opponent's board
    pub fn strike(&mut self, slot: PlayerSlot, coordinate: Coordinate) -> StrikeOutcome {
        let opponent = slot.opponent().index();
        let hit_index = self.players[opponent]
            .active_ships
            .iter()
            .position(|ship| ship.occupies(coordinate));

        self.players[slot.index()]
            .strikes
            .push(Strike::new(coordinate, hit_index.is_some()));

        let Some(index) = hit_index else {
            return StrikeOutcome::Miss;
        };

        if !self.players[opponent].active_ships[index].is_sunk_by(&self.players[slot.index()].strikes) {
            return StrikeOutcome::Hit;
        }

        let board = &mut self.players[opponent];
        let ship = board.active_ships.remove(index);
        board.sunken_ships.push(ship);

        if board.active_ships.is_empty() {
            StrikeOutcome::FleetDestroyed
        } else {
            StrikeOutcome::Sunk
        }
    }

    /// Hand the move to the other seat; returns the new turn generation
    pub fn pass_turn(&mut self, now: Instant, turn_timeout: Duration) -> u64 {
        if let GameState::Turn(slot) = self.state {
            self.state = GameState::Turn(slot.opponent());
        }
        self.restart_turn_clock(now, turn_timeout)
    }

    /// Identifies the running turn; a timer from an older turn is stale
    #[must_use]
    pub fn turn_generation(&self) -> u64 {
        self.turn_generation
    }

    /// Whole seconds left of the running turn
    #[must_use]
    pub fn time_left(&self, now: Instant) -> u64 {
        self.turn_deadline
            .map_or(0, |deadline| deadline.saturating_duration_since(now).as_secs())
    }

    fn restart_turn_clock(&mut self, now: Instant, turn_timeout: Duration) -> u64 {
        self.turn_deadline = Some(now + turn_timeout);
        self.turn_generation += 1;
        self.turn_generation
    }

    /// Every connection that ever held a seat in this game
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.players.iter().filter_map(|board| board.connection)
    }

    /// Statistics for the game, `None` if it never started
    #[must_use]
    pub fn statistics(&self, completed: bool) -> Option<GameStatistics> {
        if !self.started {
            return None;
        }
        let one = self.player(PlayerSlot::One);
        let two = self.player(PlayerSlot::Two);
        let sunk = |board: &PlayerBoard| i64::try_from(board.sunken_ships.len()).unwrap_or(i64::MAX);

        Some(GameStatistics {
            ai_game: self.is_against_ai(),
            completed,
            won_against_ai: self.is_against_ai() && two.sunken_ships.len() == FLEET_SHIP_LENGTHS.len(),
            hits_player_one: one.count_strikes(true),
            misses_player_one: one.count_strikes(false),
            ships_sunk_player_one: sunk(one),
            hits_player_two: two.count_strikes(true),
            misses_player_two: two.count_strikes(false),
            ships_sunk_player_two: sunk(two),
        })
    }
}
