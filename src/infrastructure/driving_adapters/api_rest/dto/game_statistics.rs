//! Game Statistics DTOs

use serde::{Deserialize, Serialize};

use crate::domain::models::game_statistics::GameStatisticsTotals;

/// Statistics totals of all recorded games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatisticsDto {
    pub pvp_games_total: i64,
    pub pvp_games_completed: i64,
    pub pvp_hits: i64,
    pub pvp_misses: i64,
    pub pvp_ships_sunk: i64,
    pub ai_games_total: i64,
    pub ai_games_completed: i64,
    pub ai_games_won: i64,
    pub ai_player_hits: i64,
    pub ai_player_misses: i64,
    pub ai_player_ships_sunk: i64,
    pub ai_opponent_hits: i64,
    pub ai_opponent_misses: i64,
    pub ai_opponent_ships_sunk: i64,
}

impl From<GameStatisticsTotals> for GameStatisticsDto {
    fn from(totals: GameStatisticsTotals) -> Self {
        Self {
            pvp_games_total: totals.pvp_games_total,
            pvp_games_completed: totals.pvp_games_completed,
            pvp_hits: totals.pvp_hits,
            pvp_misses: totals.pvp_misses,
            pvp_ships_sunk: totals.pvp_ships_sunk,
            ai_games_total: totals.ai_games_total,
            ai_games_completed: totals.ai_games_completed,
            ai_games_won: totals.ai_games_won,
            ai_player_hits: totals.ai_player_hits,
            ai_player_misses: totals.ai_player_misses,
            ai_player_ships_sunk: totals.ai_player_ships_sunk,
            ai_opponent_hits: totals.ai_opponent_hits,
            ai_opponent_misses: totals.ai_opponent_misses,
            ai_opponent_ships_sunk: totals.ai_opponent_ships_sunk,
        }
    }
}

/// Number of games currently held in memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGamesDto {
    pub active_games: usize,
}
