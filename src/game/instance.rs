//! Game instance implementation and lifecycle management
//!
//! A game is shared by every request that addresses it. All state lives
//! behind one mutex so each operation is a single atomic step: callers never
//! observe a half-applied placement or a torn board/winner/over triple.

use crate::error::{GameResult, MatchmakingError};
use crate::game::board::{Board, Piece};
use crate::types::{GamePhase, GameState, PlayerId, Seat};
use crate::utils::{current_timestamp, generate_token, PLAYER_ID_LENGTH};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Maximum number of players seated in one game
pub const MAX_PLAYERS: usize = 2;

/// Atomic operations on a single two-player game
pub trait Game: Send + Sync + std::fmt::Debug {
    /// Seat a new player, returning their ID and assigned piece
    fn add_player(&self) -> GameResult<Seat>;

    /// Place the player's piece at `(row, col)`
    ///
    /// Coordinates are untrusted input; anything outside the board is
    /// rejected. On success the returned state is the snapshot taken in the
    /// same critical section as the move. On failure nothing changes.
    fn place(&self, player_id: &str, row: i64, col: i64) -> GameResult<GameState>;

    /// Consistent copy of board, winner and over flag
    fn snapshot(&self) -> GameResult<GameState>;

    /// Number of seated players
    fn player_count(&self) -> GameResult<usize>;

    /// Check if both seats are taken
    fn is_full(&self) -> GameResult<bool> {
        Ok(self.player_count()? >= MAX_PLAYERS)
    }

    /// Current lifecycle phase
    fn phase(&self) -> GameResult<GamePhase>;

    /// Get creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

#[derive(Debug)]
struct GameData {
    board: Board,
    over: bool,
    winner: Option<PlayerId>,
    /// Seating order: index 0 plays X, index 1 plays O
    players: Vec<(PlayerId, Piece)>,
    next_piece: Piece,
}

impl GameData {
    fn new() -> Self {
        Self {
            board: Board::new(),
            over: false,
            winner: None,
            players: Vec::with_capacity(MAX_PLAYERS),
            next_piece: Piece::X,
        }
    }

    fn piece_of(&self, player_id: &str) -> Option<Piece> {
        self.players
            .iter()
            .find(|(id, _)| id == player_id)
            .map(|(_, piece)| *piece)
    }

    fn state(&self) -> GameState {
        GameState {
            board: self.board,
            winner: self.winner.clone(),
            over: self.over,
        }
    }
}

/// Concrete implementation of a game instance
#[derive(Debug)]
pub struct GameInstance {
    data: Mutex<GameData>,
    player_id_length: usize,
    created_at: DateTime<Utc>,
}

impl GameInstance {
    /// Create an empty game with default player ID length
    pub fn new() -> Self {
        Self::with_player_id_length(PLAYER_ID_LENGTH)
    }

    /// Create an empty game issuing player IDs of the given length
    pub fn with_player_id_length(player_id_length: usize) -> Self {
        Self {
            data: Mutex::new(GameData::new()),
            player_id_length,
            created_at: current_timestamp(),
        }
    }

    fn lock(&self) -> GameResult<MutexGuard<'_, GameData>> {
        self.data
            .lock()
            .map_err(|_| MatchmakingError::lock_poisoned("game"))
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::new()
    }
}

fn to_cell(row: i64, col: i64) -> Option<(usize, usize)> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    Board::contains(row, col).then_some((row, col))
}

impl Game for GameInstance {
    fn add_player(&self) -> GameResult<Seat> {
        let mut data = self.lock()?;

        let piece = Piece::for_seat(data.players.len()).ok_or(MatchmakingError::GameFull)?;

        let mut player_id = generate_token(self.player_id_length);
        while data.piece_of(&player_id).is_some() {
            player_id = generate_token(self.player_id_length);
        }
        data.players.push((player_id.clone(), piece));

        debug!(
            "Seated player as {} ({}/{} seats)",
            piece,
            data.players.len(),
            MAX_PLAYERS
        );

        Ok(Seat { player_id, piece })
    }

    fn place(&self, player_id: &str, row: i64, col: i64) -> GameResult<GameState> {
        let mut data = self.lock()?;

        if data.over {
            return Err(MatchmakingError::GameOver);
        }
        let (row, col) = to_cell(row, col).ok_or(MatchmakingError::OutOfBounds)?;
        let piece = data
            .piece_of(player_id)
            .ok_or(MatchmakingError::PlayerNotFound)?;
        if piece != data.next_piece {
            return Err(MatchmakingError::OutOfTurn);
        }
        if data.board.get(row, col) != Some(Piece::Empty) {
            return Err(MatchmakingError::PositionOccupied);
        }

        data.board.set(row, col, piece);

        // Win is checked before fill, so a final winning move is never a draw.
        if data.board.has_winner() {
            data.over = true;
            data.winner = Some(player_id.to_string());
            debug!("{} completed a line at ({}, {})", piece, row, col);
        } else if data.board.is_complete() {
            data.over = true;
            debug!("Board filled at ({}, {}) without a line", row, col);
        } else {
            data.next_piece = piece.opponent();
        }

        Ok(data.state())
    }

    fn snapshot(&self) -> GameResult<GameState> {
        Ok(self.lock()?.state())
    }

    fn player_count(&self) -> GameResult<usize> {
        Ok(self.lock()?.players.len())
    }

    fn phase(&self) -> GameResult<GamePhase> {
        let data = self.lock()?;
        Ok(if data.over {
            GamePhase::Over
        } else if data.players.len() < MAX_PLAYERS {
            GamePhase::Waiting
        } else {
            GamePhase::InProgress
        })
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
