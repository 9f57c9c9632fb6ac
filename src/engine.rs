use crate::algorithms::{AlphaBetaSearch, Score};
use crate::boards::*;
use crate::pieces::*;

// Scores are in tenths of a pawn so the centre bonus below stays exact.
const SCORE_UNIT: Score = 10;

/// Centre control bonus, in tenths of the piece's own value.
/// A queen on d4 is worth 9 * (1 + 0.6) pawns.
const POSITION_BONUS: [[Score; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 2, 2, 2, 2, 2, 2, 0],
    [0, 2, 4, 4, 4, 4, 2, 0],
    [0, 2, 4, 6, 6, 4, 2, 0],
    [0, 2, 4, 6, 6, 4, 2, 0],
    [0, 2, 4, 4, 4, 4, 2, 0],
    [0, 2, 2, 2, 2, 2, 2, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

pub fn material_value(kind: PieceType) -> Score {
    match kind {
        PieceType::Pawn => 1,
        PieceType::Knight => 3,
        PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Queen => 9,
        PieceType::King => 100,
    }
}

/// Material scaled by centre bonus. Positive is good for white.
pub fn evaluate(board: &Board) -> Score {
    board
        .pieces()
        .map(|piece| {
            let (row, col) = piece.position.to_row_col();
            let value = material_value(piece.kind);
            let scaled = value * SCORE_UNIT + value * POSITION_BONUS[row as usize][col as usize];
            match piece.color {
                Color::White => scaled,
                Color::Black => -scaled,
            }
        })
        .sum()
}

/// The engine behind the automated opponent: plain material and centre
/// control, searched with fixed-depth alpha-beta.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEngine;

impl AlphaBetaSearch for StandardEngine {
    fn score(&self, board: &Board) -> Score {
        evaluate(board)
    }
}
