//! Matchmaker implementation for seating players and routing game requests
//!
//! The matchmaker fills one game before opening the next. Deciding whether the
//! current game can take another player and seating that player is a single
//! step serialized across all joins. Moves and lookups only touch the registry
//! long enough to find their game, then run under that game's own lock, so
//! traffic on different games never contends.

use crate::config::MatchmakingSettings;
use crate::error::{GameResult, MatchmakingError};
use crate::game::{Game, GameInstance};
use crate::matchmaker::registry::BoundedRegistry;
use crate::types::{GameId, GameState, JoinOutcome};
use crate::utils::{generate_token, GAME_ID_LENGTH, PLAYER_ID_LENGTH};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Default number of games kept addressable at once
pub const DEFAULT_MAX_GAMES: usize = 1000;

/// Statistics about matchmaker operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchmakerStats {
    /// Total number of games created
    pub games_created: u64,
    /// Total number of games dropped from the registry to make room
    pub games_evicted: u64,
    /// Total number of players seated
    pub players_joined: u64,
    /// Total number of accepted placements
    pub moves_placed: u64,
    /// Total number of games that reached a win or draw
    pub games_finished: u64,
    /// Games currently addressable
    pub active_games: usize,
    /// Registry capacity
    pub max_games: usize,
}

#[derive(Debug, Default)]
struct Counters {
    games_created: AtomicU64,
    games_evicted: AtomicU64,
    players_joined: AtomicU64,
    moves_placed: AtomicU64,
    games_finished: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

/// The game currently accepting players
struct JoinableGame {
    game_id: GameId,
    game: Arc<dyn Game>,
}

/// Owns every live game and the pointer to the one open for joining
pub struct Matchmaker {
    games: BoundedRegistry<GameId, Arc<dyn Game>>,
    joinable: Mutex<Option<JoinableGame>>,
    game_id_length: usize,
    player_id_length: usize,
    counters: Counters,
}

impl Matchmaker {
    /// Create a matchmaker keeping at most `max_games` games addressable
    pub fn new(max_games: usize) -> Self {
        Self::with_id_lengths(max_games, GAME_ID_LENGTH, PLAYER_ID_LENGTH)
    }

    /// Create a matchmaker from service configuration
    pub fn from_config(settings: &MatchmakingSettings) -> Self {
        Self::with_id_lengths(
            settings.max_games,
            settings.game_id_length,
            settings.player_id_length,
        )
    }

    /// Create with explicit identifier lengths
    pub fn with_id_lengths(
        max_games: usize,
        game_id_length: usize,
        player_id_length: usize,
    ) -> Self {
        Self {
            games: BoundedRegistry::new(max_games),
            joinable: Mutex::new(None),
            game_id_length,
            player_id_length,
            counters: Counters::default(),
        }
    }

    /// Seat a new player, opening a fresh game when the current one is full
    pub fn join(&self) -> GameResult<JoinOutcome> {
        let (game_id, seat, state) = {
            let mut joinable = self
                .joinable
                .lock()
                .map_err(|_| MatchmakingError::lock_poisoned("join"))?;

            let reusable = match joinable.as_ref() {
                Some(current) => {
                    !current.game.is_full()? && self.games.contains(&current.game_id)?
                }
                None => false,
            };

            let current = match joinable.take() {
                Some(current) if reusable => current,
                _ => self.open_game()?,
            };

            let seat = current.game.add_player();
            let game_id = current.game_id.clone();
            let state = current.game.snapshot();
            *joinable = Some(current);

            (game_id, seat?, state?)
        };

        Counters::bump(&self.counters.players_joined, 1);
        debug!("Seated player as {} in game {}", seat.piece, game_id);

        Ok(JoinOutcome {
            game_id,
            player_id: seat.player_id,
            piece: seat.piece,
            state,
        })
    }

    /// Place a piece in the given game on behalf of a player
    pub fn place(
        &self,
        game_id: &str,
        player_id: &str,
        row: i64,
        col: i64,
    ) -> GameResult<GameState> {
        let game = self.lookup(game_id)?;
        let state = game.place(player_id, row, col)?;

        Counters::bump(&self.counters.moves_placed, 1);
        debug!("Placed piece at ({}, {}) in game {}", row, col, game_id);

        if state.over {
            Counters::bump(&self.counters.games_finished, 1);
            match &state.winner {
                Some(_) => info!("Game {} over - won on ({}, {})", game_id, row, col),
                None => info!("Game {} over - draw", game_id),
            }
        }

        Ok(state)
    }

    /// Get a consistent snapshot of a game
    pub fn get_game(&self, game_id: &str) -> GameResult<GameState> {
        self.lookup(game_id)?.snapshot()
    }

    /// Get matchmaker statistics
    pub fn get_stats(&self) -> GameResult<MatchmakerStats> {
        let c = &self.counters;
        Ok(MatchmakerStats {
            games_created: c.games_created.load(Ordering::Relaxed),
            games_evicted: c.games_evicted.load(Ordering::Relaxed),
            players_joined: c.players_joined.load(Ordering::Relaxed),
            moves_placed: c.moves_placed.load(Ordering::Relaxed),
            games_finished: c.games_finished.load(Ordering::Relaxed),
            active_games: self.games.len()?,
            max_games: self.games.capacity(),
        })
    }

    fn lookup(&self, game_id: &str) -> GameResult<Arc<dyn Game>> {
        self.games
            .get(&game_id.to_string())?
            .ok_or(MatchmakingError::GameNotFound)
    }

    /// Create a game and register it, evicting the least recently used if full
    fn open_game(&self) -> GameResult<JoinableGame> {
        let mut game_id = generate_token(self.game_id_length);
        while self.games.contains(&game_id)? {
            game_id = generate_token(self.game_id_length);
        }

        let game: Arc<dyn Game> = Arc::new(GameInstance::with_player_id_length(
            self.player_id_length,
        ));
        let evicted = self.games.insert(game_id.clone(), game.clone())?;

        Counters::bump(&self.counters.games_created, 1);
        Counters::bump(&self.counters.games_evicted, evicted.len() as u64);

        for (old_id, old_game) in &evicted {
            info!(
                "Evicted game {} (created {}) to make room",
                old_id,
                old_game.created_at().to_rfc3339()
            );
        }
        info!("Created new game {}", game_id);

        Ok(JoinableGame { game_id, game })
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GAMES)
    }
}

impl std::fmt::Debug for Matchmaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matchmaker")
            .field("max_games", &self.games.capacity())
            .field("game_id_length", &self.game_id_length)
            .field("player_id_length", &self.player_id_length)
            .finish()
    }
}
