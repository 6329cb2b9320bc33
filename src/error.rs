//! Error types for the matchmaking service
//!
//! Game and matchmaker operations return [`GameResult`] so callers can match on
//! the exact rejection. Service plumbing (configuration, startup, transport)
//! uses anyhow for consistent error handling.

/// Result type alias for service-level code
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for game and matchmaker operations
pub type GameResult<T> = std::result::Result<T, MatchmakingError>;

/// Errors surfaced to callers of the matchmaker
///
/// The display strings are part of the wire contract and are returned to
/// clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchmakingError {
    #[error("game does not exist")]
    GameNotFound,

    #[error("game is full")]
    GameFull,

    #[error("game is over")]
    GameOver,

    #[error("position is outside game board")]
    OutOfBounds,

    #[error("player does not exist")]
    PlayerNotFound,

    #[error("you cannot place twice in a row")]
    OutOfTurn,

    #[error("position is already occupied")]
    PositionOccupied,

    #[error("Internal service error: {message}")]
    Internal { message: String },
}

impl MatchmakingError {
    /// The requested game is unknown (never created, or evicted)
    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchmakingError::GameNotFound)
    }

    /// The request was well-formed but the game's state rejects it
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MatchmakingError::GameFull
                | MatchmakingError::GameOver
                | MatchmakingError::OutOfBounds
                | MatchmakingError::PlayerNotFound
                | MatchmakingError::OutOfTurn
                | MatchmakingError::PositionOccupied
        )
    }

    pub(crate) fn lock_poisoned(what: &str) -> Self {
        MatchmakingError::Internal {
            message: format!("Failed to acquire {} lock", what),
        }
    }
}
