use crate::positions::Position;
use std::fmt::{self, Display};

// ---------------------------------------------
// Pieces
// ---------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row step of a pawn push. White moves up the board (towards row 0).
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn algebraic(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    pub fn from_algebraic(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}

/// A piece standing on the board. `position` always matches the square that
/// holds it; every board mutator keeps the two in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
    pub position: Position,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType, position: Position) -> Piece {
        Piece {
            color,
            kind,
            position,
            has_moved: false,
        }
    }

    /// Diagram letter: uppercase for white, lowercase for black.
    pub fn letter(&self) -> char {
        match self.color {
            Color::White => self.kind.algebraic(),
            Color::Black => self.kind.algebraic().to_ascii_lowercase(),
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PieceType::*;
        let symbol = match (self.color, self.kind) {
            (Color::White, King) => '\u{2654}',
            (Color::White, Queen) => '\u{2655}',
            (Color::White, Rook) => '\u{2656}',
            (Color::White, Bishop) => '\u{2657}',
            (Color::White, Knight) => '\u{2658}',
            (Color::White, Pawn) => '\u{2659}',
            (Color::Black, King) => '\u{265a}',
            (Color::Black, Queen) => '\u{265b}',
            (Color::Black, Rook) => '\u{265c}',
            (Color::Black, Bishop) => '\u{265d}',
            (Color::Black, Knight) => '\u{265e}',
            (Color::Black, Pawn) => '\u{265f}',
        };
        write!(f, "{}", symbol)
    }
}
