//! Game Event Builders
//!
//! The events each seat receives as a game progresses.

use tokio::time::Instant;

use crate::domain::models::game_event::{GameEvent, GameEventType};
use crate::domain::models::game_session::{GameSession, PlayerSlot};
use crate::domain::models::ids::GameId;

pub fn waiting_opponent(game_id: GameId) -> GameEvent {
    GameEvent::of(GameEventType::WaitingOpponent).with_game_id(game_id)
}

pub fn waiting_friend(game_id: GameId) -> GameEvent {
    GameEvent::of(GameEventType::WaitingFriend).with_game_id(game_id)
}

fn turn_type(session: &GameSession, slot: PlayerSlot) -> GameEventType {
    if session.is_turn_of(slot) {
        GameEventType::TurnOwn
    } else {
        GameEventType::TurnOpponent
    }
}

/// First event of a started game
pub fn game_started(session: &GameSession, slot: PlayerSlot, now: Instant) -> GameEvent {
    GameEvent::of(turn_type(session, slot))
        .with_game_id(session.id())
        .with_time_left(session.time_left(now))
}

/// Sent to the player who just struck; the turn has passed to the opponent
pub fn own_strike(session: &GameSession, slot: PlayerSlot, now: Instant, ship_sunk: bool) -> GameEvent {
    let event = GameEvent::of(GameEventType::TurnOpponent)
        .with_own_strikes(session.player(slot).strikes())
        .with_time_left(session.time_left(now));
    if ship_sunk {
        event.with_opponent_sunken_ships(session.player(slot.opponent()).sunken_ships())
    } else {
        event
    }
}

/// Sent to the player who was struck; it is now their turn
pub fn opponent_strike(session: &GameSession, slot: PlayerSlot, now: Instant, ship_sunk: bool) -> GameEvent {
    let own = session.player(slot);
    let event = GameEvent::of(GameEventType::TurnOwn)
        .with_opponent_strikes(session.player(slot.opponent()).strikes())
        .with_time_left(session.time_left(now));
    if ship_sunk {
        event
            .with_own_sunken_ships(own.sunken_ships())
            .with_own_active_ships(own.active_ships())
    } else {
        event
    }
}

pub fn won(session: &GameSession, slot: PlayerSlot) -> GameEvent {
    GameEvent::of(GameEventType::Won)
        .with_own_strikes(session.player(slot).strikes())
        .with_opponent_sunken_ships(session.player(slot.opponent()).sunken_ships())
}

pub fn lost(session: &GameSession, slot: PlayerSlot) -> GameEvent {
    GameEvent::of(GameEventType::Lost)
        .with_opponent_strikes(session.player(slot.opponent()).strikes())
        .with_own_sunken_ships(session.player(slot).sunken_ships())
}

/// Full board state for a player taking a seat back
pub fn reconnected(session: &GameSession, slot: PlayerSlot, now: Instant) -> GameEvent {
    let own = session.player(slot);
    let opponent = session.player(slot.opponent());
    GameEvent::of(turn_type(session, slot))
        .with_game_id(session.id())
        .with_own_strikes(own.strikes())
        .with_opponent_strikes(opponent.strikes())
        .with_own_active_ships(own.active_ships())
        .with_own_sunken_ships(own.sunken_ships())
        .with_opponent_sunken_ships(opponent.sunken_ships())
        .with_time_left(session.time_left(now))
}

pub fn timed_out(own_turn: bool) -> GameEvent {
    GameEvent::of(if own_turn {
        GameEventType::TimeoutOwn
    } else {
        GameEventType::TimeoutOpponent
    })
}

pub fn opponent_left() -> GameEvent {
    GameEvent::of(GameEventType::OpponentLeft)
}
