//! Board representation and terminal-state detection
//!
//! Pieces are encoded as +1 (X), -1 (O) and 0 (empty). A line whose sum is
//! exactly +3 or -3 is three of one piece in a row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const BOARD_SIZE: usize = 3;

/// A tic-tac-toe piece
///
/// The first player seated in a game plays `X`, the second plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Piece {
    #[default]
    Empty,
    X,
    O,
}

impl Piece {
    /// Signed encoding used for line sums and on the wire
    pub fn value(self) -> i8 {
        match self {
            Piece::Empty => 0,
            Piece::X => 1,
            Piece::O => -1,
        }
    }

    /// The piece that moves after this one
    pub fn opponent(self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
            Piece::Empty => Piece::Empty,
        }
    }

    /// Piece assigned to the player taking the given seat (0 or 1)
    pub fn for_seat(seat: usize) -> Option<Piece> {
        match seat {
            0 => Some(Piece::X),
            1 => Some(Piece::O),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }
}

impl From<Piece> for i8 {
    fn from(piece: Piece) -> Self {
        piece.value()
    }
}

impl TryFrom<i8> for Piece {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Piece::Empty),
            1 => Ok(Piece::X),
            -1 => Ok(Piece::O),
            other => Err(format!("invalid piece value: {}", other)),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Empty => write!(f, "-"),
            Piece::X => write!(f, "X"),
            Piece::O => write!(f, "O"),
        }
    }
}

/// A 3x3 grid of pieces, empty on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([[Piece; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [[Piece; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[Piece; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    /// Piece at `(row, col)`, or `None` if the position is off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Check whether a position lies on the board
    pub fn contains(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, piece: Piece) {
        self.0[row][col] = piece;
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.0
            .iter()
            .flatten()
            .filter(|piece| !piece.is_empty())
            .count()
    }

    /// True if some row, column or diagonal holds three of one piece
    ///
    /// Empty cells contribute zero, so this is valid on partially filled boards.
    pub fn has_winner(&self) -> bool {
        let mut col_sums = [0i8; BOARD_SIZE];
        let mut diag_sums = [0i8; 2];

        for (i, row) in self.0.iter().enumerate() {
            let mut row_sum = 0i8;
            for (j, piece) in row.iter().enumerate() {
                let v = piece.value();
                row_sum += v;
                col_sums[j] += v;
                if i == j {
                    diag_sums[0] += v;
                }
                if i == BOARD_SIZE - 1 - j {
                    diag_sums[1] += v;
                }
            }
            if is_winning_sum(row_sum) {
                return true;
            }
        }

        col_sums
            .iter()
            .chain(diag_sums.iter())
            .any(|&sum| is_winning_sum(sum))
    }

    /// True if every cell is occupied
    pub fn is_complete(&self) -> bool {
        self.0.iter().flatten().all(|piece| !piece.is_empty())
    }
}

fn is_winning_sum(sum: i8) -> bool {
    sum.unsigned_abs() as usize == BOARD_SIZE
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for piece in row {
                write!(f, "{}", piece)?;
            }
        }
        Ok(())
    }
}
