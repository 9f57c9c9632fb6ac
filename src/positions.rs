use crate::chess_errors::*;
use std::fmt::{self, Display};
use std::ops;
use std::str::FromStr;

// Chessboard positions on a 8x8 board.
//
// Numbered as follows (row 0 is black's back rank):
//
//     a  b  c  d  e  f  g  h
//   ---------------------------
// 8 | 0  1  2  3  4  5  6  7  | 8
// 7 | 8  9  10 11 12 13 14 15 | 7
// 6 | 16 17 18 19 20 21 22 23 | 6
// 5 | 24 25 26 27 28 29 30 31 | 5
// 4 | 32 33 34 35 36 37 38 39 | 4
// 3 | 40 41 42 43 44 45 46 47 | 3
// 2 | 48 49 50 51 52 53 54 55 | 2
// 1 | 56 57 58 59 60 61 62 63 | 1
//   ---------------------------
//    a  b  c  d  e  f  g  h
//
// ---------------------------------------------
// Positions
// ---------------------------------------------

pub const BOARD_SIZE: u8 = 8;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u8);

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ChessError::InvalidPosition(s.to_string());
        let mut chars = s.chars();

        let file = chars.next().ok_or_else(err)?;
        let rank = chars.next().and_then(|r| r.to_digit(10)).ok_or_else(err)?;

        // Too many characters || rank is invalid
        if chars.next().is_some() || !(1..=8).contains(&rank) || !('a'..='h').contains(&file) {
            return Err(err());
        }

        Ok(Position::from_row_col(
            (8 - rank) as u8,
            file as u8 - b'a',
        ))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.to_row_col();
        write!(f, "{}{}", (b'a' + col) as char, 8 - row)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub struct PositionIterator(u8);

impl Iterator for PositionIterator {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 >= BOARD_SIZE * BOARD_SIZE {
            None
        } else {
            self.0 += 1;
            Some(Position(self.0 - 1))
        }
    }
}

impl Position {
    /// Transforms a row and a col to Position on the board.
    /// Row and col must correspond to a legal board position.
    pub const fn from_row_col(row: u8, col: u8) -> Position {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Position(row * BOARD_SIZE + col)
    }

    /// Example: Position 63 (H1 in chess board) is mapped to (7,7)
    pub const fn to_row_col(self) -> (u8, u8) {
        (self.0 / BOARD_SIZE, self.0 % BOARD_SIZE)
    }

    pub const fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    pub const fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Checks if row and col belong to a legal board position.
    pub const fn in_board(row: i16, col: i16) -> bool {
        row >= 0 && col >= 0 && row < BOARD_SIZE as i16 && col < BOARD_SIZE as i16
    }

    /// Iterates over all positions in row-major order, a8 first.
    pub fn all_positions() -> PositionIterator {
        PositionIterator(0)
    }
}

// ---------------------------------------------
// Offsets
// ---------------------------------------------

/// A step on the board, in rows and columns. Adding an offset to a position
/// yields `None` once the step leaves the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Offset {
    pub rows: i8,
    pub cols: i8,
}

impl Offset {
    pub const fn new(rows: i8, cols: i8) -> Offset {
        Offset { rows, cols }
    }
}

impl_op_ex!(+ |a: &Position, b: &Offset| -> Option<Position> {
    let row = a.row() as i16 + b.rows as i16;
    let col = a.col() as i16 + b.cols as i16;
    if Position::in_board(row, col) {
        Some(Position::from_row_col(row as u8, col as u8))
    } else {
        None
    }
});
