//! Common types used throughout the matchmaking service

use crate::game::board::{Board, Piece};
use serde::{Deserialize, Serialize};

/// Opaque, unguessable player identifier. Holding it authorizes moves.
pub type PlayerId = String;

/// Opaque, unguessable game identifier
pub type GameId = String;

/// Coarse lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fewer than two players seated
    Waiting,
    /// Both seats taken, no winner yet
    InProgress,
    /// Terminal: a player won or the board filled
    Over,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Waiting => write!(f, "Waiting"),
            GamePhase::InProgress => write!(f, "InProgress"),
            GamePhase::Over => write!(f, "Over"),
        }
    }
}

/// Consistent view of a game at a single moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    /// Set only when a player completed a line. `None` on a finished game is a draw.
    pub winner: Option<PlayerId>,
    pub over: bool,
}

impl GameState {
    pub fn is_draw(&self) -> bool {
        self.over && self.winner.is_none()
    }
}

/// A newly seated player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub piece: Piece,
}

/// Result of a successful join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub piece: Piece,
    pub state: GameState,
}
