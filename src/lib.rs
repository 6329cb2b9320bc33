//! Parlor Tic-Tac-Toe - Matchmaking and game-state service
//!
//! This crate seats players into two-player tic-tac-toe games, first come
//! first seated, and serves moves and game lookups concurrently while keeping
//! the number of live games bounded.

pub mod config;
pub mod error;
pub mod game;
pub mod matchmaker;
pub mod rpc;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{GameResult, MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use game::{Board, Game, GameInstance, Piece};
pub use matchmaker::{Matchmaker, MatchmakerStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
