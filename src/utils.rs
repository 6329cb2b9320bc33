//! Utility functions for the matchmaking service

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Default length of generated game IDs
pub const GAME_ID_LENGTH: usize = 20;

/// Default length of generated player IDs
pub const PLAYER_ID_LENGTH: usize = 10;

/// Generate an unpredictable alphanumeric token of the given length
///
/// Tokens come from the thread-local CSPRNG, so they are safe to use as
/// bearer credentials.
pub fn generate_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}
