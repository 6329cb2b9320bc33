//! Game state machine for a single two-player tic-tac-toe match
//!
//! A game knows nothing about other games. It seats at most two players,
//! enforces turn order and detects wins and draws after every placement.

pub mod board;
pub mod instance;

// Re-export commonly used types
pub use board::{Board, Piece, BOARD_SIZE};
pub use instance::{Game, GameInstance, MAX_PLAYERS};
