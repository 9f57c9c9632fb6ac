//! Describing the moves that can be done in a chessboard.
use crate::pieces::*;
use crate::positions::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub start: Position,
    pub end: Position,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Move { start, end }
    }
}

/// History entry. Holds everything needed to take the move back: the mover as
/// it stood before moving and whatever it captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// Played by the automated opponent
    pub automated: bool,
}

impl MoveRecord {
    pub fn color(&self) -> Color {
        self.piece.color
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.piece.kind.algebraic(),
            self.mv.start,
            if self.captured.is_some() { "x" } else { "" },
            self.mv.end
        )
    }
}
