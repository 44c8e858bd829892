//! Game Statistics Domain Model
//!
//! Per-game statistics and the running totals they are added to.

/// Statistics of one finished game.
///
/// Hits and misses count the strikes a player made. `ships_sunk_player_one`
/// is the number of player one's own ships that were sunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStatistics {
    pub ai_game: bool,
    pub completed: bool,
    pub won_against_ai: bool,
    pub hits_player_one: i64,
    pub misses_player_one: i64,
    pub ships_sunk_player_one: i64,
    pub hits_player_two: i64,
    pub misses_player_two: i64,
    pub ships_sunk_player_two: i64,
}

/// Running totals across all recorded games.
///
/// Also used as the increment a single game adds to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameStatisticsTotals {
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

impl GameStatisticsTotals {
    /// Add another set of totals to this one
    pub fn add(&mut self, other: &GameStatisticsTotals) {
        self.pvp_games_total += other.pvp_games_total;
        self.pvp_games_completed += other.pvp_games_completed;
        self.pvp_hits += other.pvp_hits;
        self.pvp_misses += other.pvp_misses;
        self.pvp_ships_sunk += other.pvp_ships_sunk;
        self.ai_games_total += other.ai_games_total;
        self.ai_games_completed += other.ai_games_completed;
        self.ai_games_won += other.ai_games_won;
        self.ai_player_hits += other.ai_player_hits;
        self.ai_player_misses += other.ai_player_misses;
        self.ai_player_ships_sunk += other.ai_player_ships_sunk;
        self.ai_opponent_hits += other.ai_opponent_hits;
        self.ai_opponent_misses += other.ai_opponent_misses;
        self.ai_opponent_ships_sunk += other.ai_opponent_ships_sunk;
    }
}

impl From<&GameStatistics> for GameStatisticsTotals {
    fn from(game: &GameStatistics) -> Self {
        let flag = |value: bool| i64::from(value);

        if game.ai_game {
            Self {
                ai_games_total: 1,
                ai_games_completed: flag(game.completed),
                ai_games_won: flag(game.won_against_ai),
                ai_player_hits: game.hits_player_one,
                ai_player_misses: game.misses_player_one,
                ai_player_ships_sunk: game.ships_sunk_player_one,
                ai_opponent_hits: game.hits_player_two,
                ai_opponent_misses: game.misses_player_two,
                ai_opponent_ships_sunk: game.ships_sunk_player_two,
                ..Self::default()
            }
        } else {
            Self {
                pvp_games_total: 1,
                pvp_games_completed: flag(game.completed),
                pvp_hits: game.hits_player_one + game.hits_player_two,
                pvp_misses: game.misses_player_one + game.misses_player_two,
                pvp_ships_sunk: game.ships_sunk_player_one + game.ships_sunk_player_two,
                ..Self::default()
            }
        }
    }
}
