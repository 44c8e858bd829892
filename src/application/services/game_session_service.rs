//! Game Session Service
//!
//! Executes player commands against the in-memory game sessions, runs the
//! turn clock and plays the AI opponent's turns.
//!
//! Every command works on the registry under one lock and collects what has
//! to be sent into an [`Outbox`]. Messages are queued to the players before
//! the lock is released, so each player sees them in game order. The
//! statistics of a finished game are recorded after the lock is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::game_events;
use crate::application::use_cases::RecordGameStatisticsUseCase;
use crate::domain::gateways::{GameStatisticsRepository, PlayerNotifier};
use crate::domain::models::board::{Coordinate, Ship};
use crate::domain::models::game_event::GameEvent;
use crate::domain::models::game_session::{GameMode, GameSession, GameState, PlayerSlot, StrikeOutcome};
use crate::domain::models::game_statistics::GameStatistics;
use crate::domain::models::ids::{ConnectionId, GameId};
use crate::domain::services::{ai_opponent, game_rules};
use crate::shared::errors::GameError;

const SLOTS: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

/// Timing of a game
#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    /// Time a player has for one strike
    pub turn_timeout: Duration,
    /// Pause before the AI strikes back
    pub ai_response_delay: Duration,
    /// How long an AI game waits for its player to reconnect
    pub ai_reconnect_grace: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(120),
            ai_response_delay: Duration::from_secs(2),
            ai_reconnect_grace: Duration::from_secs(10),
        }
    }
}

struct SessionEntry {
    session: GameSession,
    turn_timer: Option<AbortHandle>,
    reconnect_grace: Option<AbortHandle>,
}

impl SessionEntry {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            turn_timer: None,
            reconnect_grace: None,
        }
    }

    fn cancel_timers(&mut self) {
        for handle in [self.turn_timer.take(), self.reconnect_grace.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

#[derive(Default)]
struct SessionRegistry {
    games: HashMap<GameId, SessionEntry>,
    by_connection: HashMap<ConnectionId, GameId>,
}

impl SessionRegistry {
    fn insert(&mut self, session: GameSession) -> GameId {
        let game_id = session.id();
        for connection in session.connections() {
            self.by_connection.insert(connection, game_id);
        }
        self.games.insert(game_id, SessionEntry::new(session));
        game_id
    }

    fn remove(&mut self, game_id: GameId) -> Option<SessionEntry> {
        let mut entry = self.games.remove(&game_id)?;
        entry.cancel_timers();
        for connection in entry.session.connections() {
            if self.by_connection.get(&connection) == Some(&game_id) {
                self.by_connection.remove(&connection);
            }
        }
        Some(entry)
    }
}

enum Outgoing {
    Event(ConnectionId, GameEvent),
    Text(ConnectionId, String),
    Close(ConnectionId),
}

/// What a command decided to send and the statistics of a game it ended
#[derive(Default)]
struct Outbox {
    messages: Vec<Outgoing>,
    finished_game: Option<GameStatistics>,
}

impl Outbox {
    fn rejection(connection: ConnectionId, error: GameError) -> Self {
        let mut outbox = Self::default();
        match error.event_type() {
            Some(event_type) => outbox.event(connection, GameEvent::of(event_type)),
            None => outbox.messages.push(Outgoing::Text(connection, error.to_string())),
        }
        if error.closes_connection() {
            outbox.close(connection);
        }
        outbox
    }

    fn event(&mut self, connection: ConnectionId, event: GameEvent) {
        self.messages.push(Outgoing::Event(connection, event));
    }

    fn close(&mut self, connection: ConnectionId) {
        self.messages.push(Outgoing::Close(connection));
    }
}

/// Service running every game held by this server
pub struct GameSessionService {
    registry: Mutex<SessionRegistry>,
    notifier: Arc<dyn PlayerNotifier>,
    record_statistics: RecordGameStatisticsUseCase,
    settings: GameSettings,
}

impl GameSessionService {
    /// Create a new GameSessionService
    #[must_use]
    pub fn new(
        notifier: Arc<dyn PlayerNotifier>,
        statistics_repository: Arc<dyn GameStatisticsRepository>,
        settings: GameSettings,
    ) -> Self {
        Self {
            registry: Mutex::new(SessionRegistry::default()),
            notifier,
            record_statistics: RecordGameStatisticsUseCase::new(statistics_repository),
            settings,
        }
    }

    /// Number of games held in memory
    #[must_use]
    pub fn active_games(&self) -> usize {
        self.lock_registry().games.len()
    }

    /// Join the next player looking for a random opponent, or wait for one
    pub async fn join(self: &Arc<Self>, connection: ConnectionId, ships: Vec<Ship>) {
        self.execute(connection, |registry, outbox| {
            self.join_random(registry, outbox, connection, ships)
        })
        .await;
    }

    /// Create a game for a friend to join, or join a friend's game by id
    pub async fn join_friend(self: &Arc<Self>, connection: ConnectionId, game_id: Option<&str>, ships: Vec<Ship>) {
        self.execute(connection, |registry, outbox| {
            self.join_friend_game(registry, outbox, connection, game_id, ships)
        })
        .await;
    }

    /// Start a game against the AI
    pub async fn join_ai(self: &Arc<Self>, connection: ConnectionId, ships: Vec<Ship>) {
        self.execute(connection, |registry, outbox| {
            self.join_ai_game(registry, outbox, connection, ships)
        })
        .await;
    }

    /// Take back the seat of a disconnected player
    pub async fn reconnect(self: &Arc<Self>, connection: ConnectionId, game_id: Option<&str>) {
        self.execute(connection, |registry, outbox| {
            Self::reconnect_player(registry, outbox, connection, game_id)
        })
        .await;
    }

    /// Leave a game; it ends for both players
    pub async fn leave(self: &Arc<Self>, connection: ConnectionId, game_id: Option<&str>) {
        self.execute(connection, |registry, outbox| {
            Self::leave_game(registry, outbox, connection, game_id)
        })
        .await;
    }

    /// Strike a cell on the opponent's board
    pub async fn strike(
        self: &Arc<Self>,
        connection: ConnectionId,
        game_id: Option<&str>,
        row: Option<i32>,
        column: Option<i32>,
    ) {
        self.execute(connection, |registry, outbox| {
            self.strike_cell(registry, outbox, connection, game_id, row, column)
        })
        .await;
    }

    /// Tell the player the command was rejected
    pub fn reject(&self, connection: ConnectionId, error: GameError) {
        self.deliver(Outbox::rejection(connection, error));
    }

    /// The player's connection is gone.
    ///
    /// The seat is kept for a reconnect while the opponent is still
    /// connected; an AI game waits for the reconnect grace period. Any other
    /// game ends.
    pub async fn connection_closed(self: &Arc<Self>, connection: ConnectionId) {
        let finished_game = {
            let mut registry = self.lock_registry();
            let mut outbox = Outbox::default();
            self.release_seat(&mut registry, &mut outbox, connection);
            self.deliver(outbox)
        };
        self.record(finished_game).await;
    }

    fn lock_registry(&self) -> MutexGuard<'_, SessionRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn execute<F>(&self, connection: ConnectionId, command: F)
    where
        F: FnOnce(&mut SessionRegistry, &mut Outbox) -> Result<(), GameError>,
    {
        let finished_game = {
            let mut registry = self.lock_registry();
            let mut outbox = Outbox::default();
            let outbox = match command(&mut registry, &mut outbox) {
                Ok(()) => outbox,
                Err(error) => {
                    tracing::warn!(connection_id = %connection, error = %error, "Rejected game command");
                    Outbox::rejection(connection, error)
                }
            };
            self.deliver(outbox)
        };
        self.record(finished_game).await;
    }

    /// Queue the outbox messages; returns the statistics still to be recorded
    fn deliver(&self, outbox: Outbox) -> Option<GameStatistics> {
        for message in outbox.messages {
            match message {
                Outgoing::Event(connection, event) => self.notifier.send_event(&connection, &event),
                Outgoing::Text(connection, text) => self.notifier.send_text(&connection, &text),
                Outgoing::Close(connection) => self.notifier.close(&connection),
            }
        }
        outbox.finished_game
    }

    async fn record(&self, finished_game: Option<GameStatistics>) {
        if let Some(statistics) = finished_game {
            if let Err(error) = self.record_statistics.execute(&statistics).await {
                tracing::error!(error = %error, "Failed to record game statistics");
            }
        }
    }

    fn check_can_join(registry: &SessionRegistry, connection: ConnectionId, ships: &[Ship]) -> Result<(), GameError> {
        if registry.by_connection.contains_key(&connection) {
            return Err(GameError::AlreadyInGame);
        }
        if !game_rules::is_valid_fleet(ships) {
            return Err(GameError::InvalidShips);
        }
        Ok(())
    }

    fn join_random(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        ships: Vec<Ship>,
    ) -> Result<(), GameError> {
        Self::check_can_join(registry, connection, &ships)?;

        let open_game = registry
            .games
            .values()
            .find(|entry| entry.session.is_open_for(GameMode::Random))
            .map(|entry| entry.session.id());

        match open_game {
            Some(game_id) => self.seat_second_player(registry, outbox, game_id, connection, ships),
            None => {
                let mut session = GameSession::new(GameMode::Random);
                session.seat_player(PlayerSlot::One, connection, ships);
                let game_id = registry.insert(session);
                tracing::info!(game_id = %game_id, connection_id = %connection, "Waiting for random opponent");
                outbox.event(connection, game_events::waiting_opponent(game_id));
            }
        }
        Ok(())
    }

    fn join_friend_game(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        game_id: Option<&str>,
        ships: Vec<Ship>,
    ) -> Result<(), GameError> {
        Self::check_can_join(registry, connection, &ships)?;

        match game_id.filter(|id| !id.is_empty()) {
            None => {
                let mut session = GameSession::new(GameMode::Friend);
                session.seat_player(PlayerSlot::One, connection, ships);
                let game_id = registry.insert(session);
                tracing::info!(game_id = %game_id, connection_id = %connection, "Waiting for friend");
                outbox.event(connection, game_events::waiting_friend(game_id));
            }
            Some(raw_id) => {
                let game_id = GameId::parse(raw_id)
                    .filter(|id| {
                        registry
                            .games
                            .get(id)
                            .is_some_and(|entry| entry.session.is_open_for(GameMode::Friend))
                    })
                    .ok_or(GameError::WrongGameId)?;
                self.seat_second_player(registry, outbox, game_id, connection, ships);
            }
        }
        Ok(())
    }

    fn join_ai_game(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        ships: Vec<Ship>,
    ) -> Result<(), GameError> {
        Self::check_can_join(registry, connection, &ships)?;

        let mut session = GameSession::new(GameMode::Ai);
        session.seat_player(PlayerSlot::One, connection, ships);
        session.seat_ai(ai_opponent::random_fleet(&mut rand::thread_rng()));
        let game_id = registry.insert(session);
        tracing::info!(game_id = %game_id, connection_id = %connection, "Starting game against AI");

        if let Some(entry) = registry.games.get_mut(&game_id) {
            self.start_game(entry, outbox);
        }
        Ok(())
    }

    fn seat_second_player(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        game_id: GameId,
        connection: ConnectionId,
        ships: Vec<Ship>,
    ) {
        let Some(entry) = registry.games.get_mut(&game_id) else {
            return;
        };
        entry.session.seat_player(PlayerSlot::Two, connection, ships);
        self.start_game(entry, outbox);
        registry.by_connection.insert(connection, game_id);
        tracing::info!(game_id = %game_id, connection_id = %connection, "Game started");
    }

    fn start_game(self: &Arc<Self>, entry: &mut SessionEntry, outbox: &mut Outbox) {
        let now = Instant::now();
        let generation = entry.session.start(now, self.settings.turn_timeout);
        self.schedule_turn_timer(entry, generation);

        for slot in SLOTS {
            if let Some(connection) = entry.session.connected_human(slot) {
                outbox.event(connection, game_events::game_started(&entry.session, slot, now));
            }
        }
    }

    fn reconnect_player(
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        game_id: Option<&str>,
    ) -> Result<(), GameError> {
        if registry.by_connection.contains_key(&connection) {
            return Err(GameError::AlreadyInGame);
        }
        let game_id = game_id.and_then(GameId::parse).ok_or(GameError::InvalidGameId)?;
        let entry = registry.games.get_mut(&game_id).ok_or(GameError::NoGame)?;
        let slot = entry
            .session
            .reconnect(connection)
            .ok_or(GameError::BothPlayersActive)?;

        if let Some(handle) = entry.reconnect_grace.take() {
            handle.abort();
        }
        outbox.event(
            connection,
            game_events::reconnected(&entry.session, slot, Instant::now()),
        );
        registry.by_connection.insert(connection, game_id);
        tracing::info!(game_id = %game_id, connection_id = %connection, slot = ?slot, "Player reconnected");
        Ok(())
    }

    fn leave_game(
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        game_id: Option<&str>,
    ) -> Result<(), GameError> {
        let game_id = game_id.and_then(GameId::parse).ok_or(GameError::InvalidGameId)?;
        let entry = registry.games.get(&game_id).ok_or(GameError::GameNotFound)?;
        let slot = entry.session.slot_of(connection).ok_or(GameError::WrongSession)?;

        if let Some(opponent) = entry.session.connected_human(slot.opponent()) {
            outbox.event(opponent, game_events::opponent_left());
        }
        outbox.event(connection, GameEvent::empty());
        tracing::info!(game_id = %game_id, connection_id = %connection, "Player left game");
        Self::end_game(registry, outbox, game_id, false);
        Ok(())
    }

    fn release_seat(self: &Arc<Self>, registry: &mut SessionRegistry, outbox: &mut Outbox, connection: ConnectionId) {
        let Some(game_id) = registry.by_connection.remove(&connection) else {
            return;
        };
        let Some(entry) = registry.games.get_mut(&game_id) else {
            return;
        };
        let Some(slot) = entry.session.slot_of(connection) else {
            return;
        };
        entry.session.mark_disconnected(slot);

        if entry.session.connected_human(slot.opponent()).is_some() {
            tracing::info!(game_id = %game_id, slot = ?slot, "Player disconnected, seat kept for reconnect");
        } else if entry.session.is_against_ai() && entry.session.is_started() {
            tracing::info!(game_id = %game_id, "Player disconnected from AI game, waiting for reconnect");
            self.schedule_reconnect_grace(entry);
        } else {
            Self::end_game(registry, outbox, game_id, false);
        }
    }

    fn strike_cell(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        connection: ConnectionId,
        game_id: Option<&str>,
        row: Option<i32>,
        column: Option<i32>,
    ) -> Result<(), GameError> {
        let game_id = game_id.and_then(GameId::parse).ok_or(GameError::InvalidGameId)?;
        let session = &registry.games.get(&game_id).ok_or(GameError::GameNotFound)?.session;
        let (Some(row), Some(column)) = (row, column) else {
            return Err(GameError::MissingCoordinates);
        };
        let coordinate = Coordinate::new(row, column).ok_or(GameError::InvalidCoordinates)?;
        let slot = session.slot_of(connection).ok_or(GameError::WrongSession)?;
        if !session.is_started() {
            return Err(GameError::GameNotStarted);
        }
        if !session.is_turn_of(slot) {
            return Err(GameError::NotYourTurn);
        }
        if session.has_struck(slot, coordinate) {
            return Err(GameError::PositionAlreadyUsed);
        }

        self.apply_strike(registry, outbox, game_id, slot, coordinate);
        Ok(())
    }

    fn apply_strike(
        self: &Arc<Self>,
        registry: &mut SessionRegistry,
        outbox: &mut Outbox,
        game_id: GameId,
        slot: PlayerSlot,
        coordinate: Coordinate,
    ) {
        let Some(entry) = registry.games.get_mut(&game_id) else {
            return;
        };
        let outcome = entry.session.strike(slot, coordinate);
        tracing::debug!(game_id = %game_id, slot = ?slot, coordinate = %coordinate, outcome = ?outcome, "Strike");

        let opponent = slot.opponent();
        if outcome == StrikeOutcome::FleetDestroyed {
            let session = &entry.session;
            if let Some(connection) = session.connected_human(slot) {
                outbox.event(connection, game_events::won(session, slot));
            }
            if let Some(connection) = session.connected_human(opponent) {
                outbox.event(connection, game_events::lost(session, opponent));
            }
            tracing::info!(game_id = %game_id, winner = ?slot, "Game won");
            Self::end_game(registry, outbox, game_id, true);
            return;
        }

        let now = Instant::now();
        let generation = entry.session.pass_turn(now, self.settings.turn_timeout);
        self.schedule_turn_timer(entry, generation);

        let session = &entry.session;
        let ship_sunk = outcome.sank_ship();
        if let Some(connection) = session.connected_human(slot) {
            outbox.event(connection, game_events::own_strike(session, slot, now, ship_sunk));
        }
        if let Some(connection) = session.connected_human(opponent) {
            outbox.event(connection, game_events::opponent_strike(session, opponent, now, ship_sunk));
        }
        if !session.is_human(opponent) {
            self.schedule_ai_strike(game_id, generation);
        }
    }

    /// Remove the game, close the players' connections and keep its statistics
    fn end_game(registry: &mut SessionRegistry, outbox: &mut Outbox, game_id: GameId, completed: bool) {
        let Some(entry) = registry.remove(game_id) else {
            return;
        };
        for slot in SLOTS {
            if let Some(connection) = entry.session.connected_human(slot) {
                outbox.close(connection);
            }
        }
        outbox.finished_game = entry.session.statistics(completed);
        tracing::info!(game_id = %game_id, completed, "Game removed");
    }

    fn schedule_turn_timer(self: &Arc<Self>, entry: &mut SessionEntry, generation: u64) {
        if let Some(handle) = entry.turn_timer.take() {
            handle.abort();
        }
        let service = Arc::clone(self);
        let game_id = entry.session.id();
        let timeout = self.settings.turn_timeout;
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            service.turn_timed_out(game_id, generation).await;
        });
        entry.turn_timer = Some(task.abort_handle());
    }

    async fn turn_timed_out(&self, game_id: GameId, generation: u64) {
        let finished_game = {
            let mut registry = self.lock_registry();
            let mut outbox = Outbox::default();
            let Some(entry) = registry.games.get_mut(&game_id) else {
                return;
            };
            let GameState::Turn(current) = entry.session.state() else {
                return;
            };
            if entry.session.turn_generation() != generation {
                return;
            }
            // Running as this timer; removing the game must not abort it
            entry.turn_timer = None;

            for slot in SLOTS {
                if let Some(connection) = entry.session.connected_human(slot) {
                    outbox.event(connection, game_events::timed_out(slot == current));
                }
            }
            tracing::info!(game_id = %game_id, slot = ?current, "Turn timed out");
            Self::end_game(&mut registry, &mut outbox, game_id, false);
            self.deliver(outbox)
        };
        self.record(finished_game).await;
    }

    fn schedule_ai_strike(self: &Arc<Self>, game_id: GameId, generation: u64) {
        let service = Arc::clone(self);
        let delay = self.settings.ai_response_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            service.ai_strike(game_id, generation).await;
        });
    }

    async fn ai_strike(self: &Arc<Self>, game_id: GameId, generation: u64) {
        let finished_game = {
            let mut registry = self.lock_registry();
            let mut outbox = Outbox::default();
            let target = registry
                .games
                .get(&game_id)
                .map(|entry| &entry.session)
                .filter(|session| session.turn_generation() == generation && session.is_turn_of(PlayerSlot::Two))
                .and_then(|session| {
                    let human = session.player(PlayerSlot::One);
                    ai_opponent::next_strike(
                        &mut rand::thread_rng(),
                        session.player(PlayerSlot::Two).strikes(),
                        human.sunken_ships(),
                        human.active_ships(),
                    )
                });
            if let Some(coordinate) = target {
                self.apply_strike(&mut registry, &mut outbox, game_id, PlayerSlot::Two, coordinate);
            }
            self.deliver(outbox)
        };
        self.record(finished_game).await;
    }

    fn schedule_reconnect_grace(self: &Arc<Self>, entry: &mut SessionEntry) {
        if let Some(handle) = entry.reconnect_grace.take() {
            handle.abort();
        }
        let service = Arc::clone(self);
        let game_id = entry.session.id();
        let grace = self.settings.ai_reconnect_grace;
        let task = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            service.reconnect_grace_expired(game_id).await;
        });
        entry.reconnect_grace = Some(task.abort_handle());
    }

    async fn reconnect_grace_expired(&self, game_id: GameId) {
        let finished_game = {
            let mut registry = self.lock_registry();
            let mut outbox = Outbox::default();
            let Some(entry) = registry.games.get_mut(&game_id) else {
                return;
            };
            if entry.session.connected_human(PlayerSlot::One).is_some() {
                return;
            }
            entry.reconnect_grace = None;
            tracing::info!(game_id = %game_id, "No reconnect to AI game");
            Self::end_game(&mut registry, &mut outbox, game_id, false);
            self.deliver(outbox)
        };
        self.record(finished_game).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::game_event::GameEventType;
    use crate::domain::models::game_statistics::GameStatisticsTotals;
    use crate::shared::errors::RepositoryError;
    use async_trait::async_trait;

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Event(ConnectionId, GameEvent),
        Text(ConnectionId, String),
        Close(ConnectionId),
    }

    #[derive(Default)]
    struct MockPlayerNotifier {
        sent: Mutex<Vec<Sent>>,
    }

    impl MockPlayerNotifier {
        fn events_for(&self, connection: ConnectionId) -> Vec<GameEvent> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter_map(|sent| match sent {
                    Sent::Event(c, event) if *c == connection => Some(event.clone()),
                    _ => None,
                })
                .collect()
        }

        fn last_event(&self, connection: ConnectionId) -> GameEvent {
            self.events_for(connection).pop().expect("an event was sent")
        }

        fn texts_for(&self, connection: ConnectionId) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter_map(|sent| match sent {
                    Sent::Text(c, text) if *c == connection => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        fn is_closed(&self, connection: ConnectionId) -> bool {
            self.sent.lock().unwrap().contains(&Sent::Close(connection))
        }
    }

    impl PlayerNotifier for MockPlayerNotifier {
        fn send_event(&self, connection: &ConnectionId, event: &GameEvent) {
            self.sent.lock().unwrap().push(Sent::Event(*connection, event.clone()));
        }

        fn send_text(&self, connection: &ConnectionId, text: &str) {
            self.sent.lock().unwrap().push(Sent::Text(*connection, text.to_string()));
        }

        fn close(&self, connection: &ConnectionId) {
            self.sent.lock().unwrap().push(Sent::Close(*connection));
        }
    }

    #[derive(Default)]
    struct MockGameStatisticsRepository {
        recorded: Mutex<Vec<GameStatisticsTotals>>,
    }

    #[async_trait]
    impl GameStatisticsRepository for MockGameStatisticsRepository {
        async fn record(&self, increment: &GameStatisticsTotals) -> Result<(), RepositoryError> {
            self.recorded.lock().unwrap().push(*increment);
            Ok(())
        }

        async fn totals(&self) -> Result<Option<GameStatisticsTotals>, RepositoryError> {
            Ok(None)
        }
    }

    struct TestGame {
        service: Arc<GameSessionService>,
        notifier: Arc<MockPlayerNotifier>,
        repository: Arc<MockGameStatisticsRepository>,
    }

    impl TestGame {
        fn new() -> Self {
            let notifier = Arc::new(MockPlayerNotifier::default());
            let repository = Arc::new(MockGameStatisticsRepository::default());
            let service = Arc::new(GameSessionService::new(
                notifier.clone(),
                repository.clone(),
                GameSettings::default(),
            ));
            Self {
                service,
                notifier,
                repository,
            }
        }

        fn recorded(&self) -> Vec<GameStatisticsTotals> {
            self.repository.recorded.lock().unwrap().clone()
        }

        /// Two players joined through random matchmaking, returns the game id
        async fn started_pair(&self, one: ConnectionId, two: ConnectionId) -> String {
            self.service.join(one, fleet()).await;
            self.service.join(two, fleet()).await;
            self.notifier.last_event(one).game_id.unwrap().to_string()
        }
    }

    fn fleet() -> Vec<Ship> {
        vec![
            Ship::place("0", 0, 0, 5, true).unwrap(),
            Ship::place("1", 2, 0, 4, true).unwrap(),
            Ship::place("2", 4, 0, 3, true).unwrap(),
            Ship::place("3", 6, 0, 3, true).unwrap(),
            Ship::place("4", 8, 0, 2, true).unwrap(),
        ]
    }

    fn fleet_cells() -> Vec<Coordinate> {
        fleet().iter().flat_map(|ship| ship.coordinates().to_vec()).collect()
    }

    fn open_water() -> Vec<Coordinate> {
        let cells = fleet_cells();
        Coordinate::all().filter(|c| !cells.contains(c)).collect()
    }

    fn at(c: Coordinate) -> (Option<i32>, Option<i32>) {
        (Some(i32::from(c.row())), Some(i32::from(c.column())))
    }

    #[tokio::test]
    async fn should_wait_for_opponent_then_start_game() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());

        game.service.join(one, fleet()).await;
        let waiting = game.notifier.last_event(one);
        assert_eq!(waiting.event_type, Some(GameEventType::WaitingOpponent));
        assert!(waiting.game_id.is_some());
        assert_eq!(game.service.active_games(), 1);

        game.service.join(two, fleet()).await;
        let first = game.notifier.last_event(one);
        let second = game.notifier.last_event(two);
        assert_eq!(first.event_type, Some(GameEventType::TurnOwn));
        assert_eq!(second.event_type, Some(GameEventType::TurnOpponent));
        assert_eq!(first.game_id, waiting.game_id);
        assert_eq!(second.game_id, waiting.game_id);
        assert_eq!(first.time_left, Some(120));
        assert_eq!(game.service.active_games(), 1);
    }

    #[tokio::test]
    async fn should_reject_invalid_fleet_and_second_join() {
        let game = TestGame::new();
        let connection = ConnectionId::new();

        game.service.join(connection, fleet()[..4].to_vec()).await;
        assert_eq!(
            game.notifier.texts_for(connection),
            vec!["Can't join a game without correct setup of ships."]
        );

        game.service.join(connection, fleet()).await;
        game.service.join_ai(connection, fleet()).await;
        assert_eq!(
            game.notifier.texts_for(connection).last().map(String::as_str),
            Some("Can't join a game when already in one")
        );
        assert_eq!(game.service.active_games(), 1);
    }

    #[tokio::test]
    async fn should_pair_friends_by_game_id() {
        let game = TestGame::new();
        let (host, friend, stranger) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

        game.service.join(stranger, fleet()).await;
        game.service.join_friend(host, None, fleet()).await;
        let waiting = game.notifier.last_event(host);
        assert_eq!(waiting.event_type, Some(GameEventType::WaitingFriend));
        let game_id = waiting.game_id.unwrap().to_string();

        game.service.join_friend(friend, Some(&game_id), fleet()).await;
        assert_eq!(game.notifier.last_event(host).event_type, Some(GameEventType::TurnOwn));
        assert_eq!(game.notifier.last_event(friend).event_type, Some(GameEventType::TurnOpponent));
        assert_eq!(
            game.notifier.last_event(stranger).event_type,
            Some(GameEventType::WaitingOpponent)
        );
    }

    #[tokio::test]
    async fn should_send_wrong_game_id_for_unknown_friend_game() {
        let game = TestGame::new();
        let connection = ConnectionId::new();

        game.service
            .join_friend(connection, Some("550e8400-e29b-41d4-a716-446655440000"), fleet())
            .await;

        assert_eq!(
            game.notifier.last_event(connection),
            GameEvent::of(GameEventType::WrongGameId)
        );
        assert!(!game.notifier.is_closed(connection));
        assert_eq!(game.service.active_games(), 0);
    }

    #[tokio::test]
    async fn should_validate_strikes_in_order() {
        let game = TestGame::new();
        let (one, two, outsider) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;
        let id = Some(game_id.as_str());

        game.service.strike(one, Some("nope"), Some(1), Some(1)).await;
        game.service
            .strike(one, Some("550e8400-e29b-41d4-a716-446655440000"), Some(1), Some(1))
            .await;
        game.service.strike(one, id, None, Some(1)).await;
        game.service.strike(one, id, Some(10), Some(1)).await;
        game.service.strike(outsider, id, Some(1), Some(1)).await;
        game.service.strike(two, id, Some(1), Some(1)).await;
        game.service.strike(one, id, Some(9), Some(9)).await;
        game.service.strike(two, id, Some(9), Some(9)).await;
        game.service.strike(one, id, Some(9), Some(9)).await;

        assert_eq!(
            game.notifier.texts_for(one),
            vec![
                "Game id is not valid.",
                "Game with that id does not exist",
                "Row and/or column values are missing",
                "Row and/or column values are not valid",
                "Can't hit same position twice",
            ]
        );
        assert_eq!(game.notifier.texts_for(outsider), vec!["Wrong session for this game"]);
        assert_eq!(game.notifier.texts_for(two), vec!["Not your turn to play"]);
    }

    #[tokio::test]
    async fn should_reject_strike_before_game_starts() {
        let game = TestGame::new();
        let host = ConnectionId::new();

        game.service.join_friend(host, None, fleet()).await;
        let game_id = game.notifier.last_event(host).game_id.unwrap().to_string();
        game.service.strike(host, Some(&game_id), Some(0), Some(0)).await;

        assert_eq!(game.notifier.texts_for(host), vec!["Game has not started yet"]);
    }

    #[tokio::test]
    async fn should_pass_turn_after_strike() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;

        let (row, column) = at(fleet_cells()[0]);
        game.service.strike(one, Some(&game_id), row, column).await;

        let striker = game.notifier.last_event(one);
        assert_eq!(striker.event_type, Some(GameEventType::TurnOpponent));
        assert_eq!(striker.own_strikes.as_ref().map(Vec::len), Some(1));
        assert!(striker.own_strikes.unwrap()[0].is_hit());
        assert_eq!(striker.opponent_sunken_ships, None);

        let struck = game.notifier.last_event(two);
        assert_eq!(struck.event_type, Some(GameEventType::TurnOwn));
        assert_eq!(struck.opponent_strikes.as_ref().map(Vec::len), Some(1));
        assert_eq!(struck.own_active_ships, None);
    }

    #[tokio::test]
    async fn should_report_sunken_ship_to_both_players() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;
        let water = open_water();

        // Sink the two-cell ship at row 8
        let (row, column) = at(Coordinate::new(8, 0).unwrap());
        game.service.strike(one, Some(&game_id), row, column).await;
        let (row, column) = at(water[0]);
        game.service.strike(two, Some(&game_id), row, column).await;
        let (row, column) = at(Coordinate::new(8, 1).unwrap());
        game.service.strike(one, Some(&game_id), row, column).await;

        let striker = game.notifier.last_event(one);
        assert_eq!(striker.opponent_sunken_ships.as_ref().map(Vec::len), Some(1));

        let struck = game.notifier.last_event(two);
        assert_eq!(struck.own_sunken_ships.as_ref().map(Vec::len), Some(1));
        assert_eq!(struck.own_active_ships.as_ref().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn should_end_game_when_fleet_destroyed() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;
        let targets = fleet_cells();
        let water = open_water();

        for (index, target) in targets.iter().enumerate() {
            let (row, column) = at(*target);
            game.service.strike(one, Some(&game_id), row, column).await;
            if index + 1 < targets.len() {
                let (row, column) = at(water[index]);
                game.service.strike(two, Some(&game_id), row, column).await;
            }
        }

        let winner = game.notifier.last_event(one);
        assert_eq!(winner.event_type, Some(GameEventType::Won));
        assert_eq!(winner.opponent_sunken_ships.as_ref().map(Vec::len), Some(5));
        let loser = game.notifier.last_event(two);
        assert_eq!(loser.event_type, Some(GameEventType::Lost));
        assert_eq!(loser.own_sunken_ships.as_ref().map(Vec::len), Some(5));
        assert!(game.notifier.is_closed(one));
        assert!(game.notifier.is_closed(two));
        assert_eq!(game.service.active_games(), 0);

        let recorded = game.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].pvp_games_total, 1);
        assert_eq!(recorded[0].pvp_games_completed, 1);
        assert_eq!(recorded[0].pvp_hits, 17);
        assert_eq!(recorded[0].pvp_misses, 16);
        assert_eq!(recorded[0].pvp_ships_sunk, 5);
    }

    #[tokio::test]
    async fn should_notify_opponent_when_player_leaves() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;

        game.service.leave(two, Some(&game_id)).await;

        assert_eq!(game.notifier.last_event(one), GameEvent::of(GameEventType::OpponentLeft));
        assert_eq!(game.notifier.last_event(two), GameEvent::empty());
        assert!(game.notifier.is_closed(one));
        assert!(game.notifier.is_closed(two));
        assert_eq!(game.service.active_games(), 0);

        let recorded = game.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].pvp_games_completed, 0);
    }

    #[tokio::test]
    async fn should_reject_leave_from_outsider() {
        let game = TestGame::new();
        let (one, two, outsider) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;

        game.service.leave(outsider, Some(&game_id)).await;
        game.service.leave(outsider, None).await;

        assert_eq!(
            game.notifier.texts_for(outsider),
            vec!["Wrong session for this game", "Game id is not valid."]
        );
        assert_eq!(game.service.active_games(), 1);
    }

    #[tokio::test]
    async fn should_remove_waiting_game_without_statistics_when_host_disconnects() {
        let game = TestGame::new();
        let host = ConnectionId::new();

        game.service.join(host, fleet()).await;
        game.service.connection_closed(host).await;

        assert_eq!(game.service.active_games(), 0);
        assert!(game.recorded().is_empty());
    }

    #[tokio::test]
    async fn should_restore_board_on_reconnect() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;
        let (row, column) = at(fleet_cells()[0]);
        game.service.strike(one, Some(&game_id), row, column).await;

        game.service.connection_closed(two).await;
        assert_eq!(game.service.active_games(), 1);

        let returning = ConnectionId::new();
        game.service.reconnect(returning, Some(&game_id)).await;

        let restored = game.notifier.last_event(returning);
        assert_eq!(restored.event_type, Some(GameEventType::TurnOwn));
        assert_eq!(restored.game_id.map(|id| id.to_string()), Some(game_id.clone()));
        assert_eq!(restored.opponent_strikes.as_ref().map(Vec::len), Some(1));
        assert_eq!(restored.own_strikes.as_ref().map(Vec::len), Some(0));
        assert_eq!(restored.own_active_ships.as_ref().map(Vec::len), Some(5));

        let (row, column) = at(open_water()[0]);
        game.service.strike(returning, Some(&game_id), row, column).await;
        assert_eq!(game.notifier.last_event(one).event_type, Some(GameEventType::TurnOwn));
    }

    #[tokio::test]
    async fn should_answer_reconnect_to_missing_game_with_no_game() {
        let game = TestGame::new();
        let connection = ConnectionId::new();

        game.service
            .reconnect(connection, Some("550e8400-e29b-41d4-a716-446655440000"))
            .await;

        assert_eq!(game.notifier.last_event(connection), GameEvent::of(GameEventType::NoGame));
        assert!(game.notifier.is_closed(connection));
    }

    #[tokio::test]
    async fn should_reject_reconnect_when_both_players_active() {
        let game = TestGame::new();
        let (one, two, third) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;

        game.service.reconnect(third, Some(&game_id)).await;

        assert_eq!(
            game.notifier.texts_for(third),
            vec!["Both players for this game are already active"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_time_out_idle_turn() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        game.started_pair(one, two).await;

        tokio::time::sleep(Duration::from_secs(121)).await;

        assert_eq!(game.notifier.last_event(one), GameEvent::of(GameEventType::TimeoutOwn));
        assert_eq!(game.notifier.last_event(two), GameEvent::of(GameEventType::TimeoutOpponent));
        assert!(game.notifier.is_closed(one));
        assert!(game.notifier.is_closed(two));
        assert_eq!(game.service.active_games(), 0);
        assert_eq!(game.recorded()[0].pvp_games_completed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_restart_turn_clock_after_strike() {
        let game = TestGame::new();
        let (one, two) = (ConnectionId::new(), ConnectionId::new());
        let game_id = game.started_pair(one, two).await;

        tokio::time::sleep(Duration::from_secs(100)).await;
        let (row, column) = at(open_water()[0]);
        game.service.strike(one, Some(&game_id), row, column).await;
        assert_eq!(game.notifier.last_event(two).time_left, Some(120));

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(game.service.active_games(), 1);

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(game.notifier.last_event(two), GameEvent::of(GameEventType::TimeoutOwn));
        assert_eq!(game.service.active_games(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_let_ai_strike_back() {
        let game = TestGame::new();
        let player = ConnectionId::new();

        game.service.join_ai(player, fleet()).await;
        let started = game.notifier.last_event(player);
        assert_eq!(started.event_type, Some(GameEventType::TurnOwn));
        let game_id = started.game_id.unwrap().to_string();

        game.service.strike(player, Some(&game_id), Some(0), Some(0)).await;
        assert_eq!(
            game.notifier.last_event(player).event_type,
            Some(GameEventType::TurnOpponent)
        );

        tokio::time::sleep(Duration::from_secs(3)).await;
        let answer = game.notifier.last_event(player);
        assert_eq!(answer.event_type, Some(GameEventType::TurnOwn));
        assert_eq!(answer.opponent_strikes.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_ai_game_for_reconnect_grace() {
        let game = TestGame::new();
        let player = ConnectionId::new();
        game.service.join_ai(player, fleet()).await;
        let game_id = game.notifier.last_event(player).game_id.unwrap().to_string();

        game.service.connection_closed(player).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(game.service.active_games(), 1);

        let returning = ConnectionId::new();
        game.service.reconnect(returning, Some(&game_id)).await;
        assert_eq!(
            game.notifier.last_event(returning).event_type,
            Some(GameEventType::TurnOwn)
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(game.service.active_games(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_remove_ai_game_after_reconnect_grace() {
        let game = TestGame::new();
        let player = ConnectionId::new();
        game.service.join_ai(player, fleet()).await;

        game.service.connection_closed(player).await;
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(game.service.active_games(), 0);
        let recorded = game.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].ai_games_total, 1);
        assert_eq!(recorded[0].ai_games_completed, 0);
    }

    #[tokio::test]
    async fn should_send_unreadable_command_as_text() {
        let game = TestGame::new();
        let connection = ConnectionId::new();

        game.service.reject(connection, GameError::UnreadableCommand);

        assert_eq!(game.notifier.texts_for(connection), vec!["Could not handle game command"]);
        assert!(!game.notifier.is_closed(connection));
    }
}
