//! Test fixtures and helpers for integration testing

#![allow(dead_code)]

use parlor_tictactoe::config::AppConfig;
use parlor_tictactoe::service::AppState;
use parlor_tictactoe::{GameState, JoinOutcome, Matchmaker, Piece};
use std::sync::Arc;

/// A move as `(seat, row, col)`; seat 0 plays X, seat 1 plays O
pub type Move = (usize, i64, i64);

/// Alternating moves that end with X completing the main diagonal
pub const X_WINS_DIAGONAL: [Move; 5] = [(0, 0, 0), (1, 0, 1), (0, 1, 1), (1, 0, 2), (0, 2, 2)];

/// Alternating moves that end with O completing the middle row
pub const O_WINS_ROW: [Move; 6] = [
    (0, 0, 0),
    (1, 1, 0),
    (0, 0, 1),
    (1, 1, 1),
    (0, 2, 2),
    (1, 1, 2),
];

/// Nine alternating moves filling the board without a line:
///
/// ```text
/// X O X
/// X O O
/// O X X
/// ```
pub const DRAW: [Move; 9] = [
    (0, 0, 0),
    (1, 0, 1),
    (0, 0, 2),
    (1, 1, 1),
    (0, 1, 0),
    (1, 1, 2),
    (0, 2, 1),
    (1, 2, 0),
    (0, 2, 2),
];

/// Seat two players in a fresh game
pub fn seat_pair(matchmaker: &Matchmaker) -> [JoinOutcome; 2] {
    let x = matchmaker.join().expect("first join");
    let o = matchmaker.join().expect("second join");
    assert_eq!(x.game_id, o.game_id, "pair should share a game");
    assert_eq!(x.piece, Piece::X);
    assert_eq!(o.piece, Piece::O);
    [x, o]
}

/// Play a sequence of moves, returning the state after each one
pub fn play(matchmaker: &Matchmaker, seats: &[JoinOutcome; 2], moves: &[Move]) -> Vec<GameState> {
    moves
        .iter()
        .map(|&(seat, row, col)| {
            let player = &seats[seat];
            matchmaker
                .place(&player.game_id, &player.player_id, row, col)
                .unwrap_or_else(|e| panic!("move ({}, {}) by seat {} failed: {}", row, col, seat, e))
        })
        .collect()
}

/// Application state with default configuration, not started
pub fn create_test_app() -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::default()).expect("default config is valid"))
}
