//! Matchmaking and routing for concurrent games
//!
//! This module admits players into games, first come first seated, and
//! dispatches moves and lookups to the right game by identifier while keeping
//! the number of live games bounded.

pub mod manager;
pub mod registry;

// Re-export commonly used types
pub use manager::{Matchmaker, MatchmakerStats, DEFAULT_MAX_GAMES};
pub use registry::BoundedRegistry;
