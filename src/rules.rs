//! Check detection and the legality filter built on top of the pseudo-legal
//! generator.
//!
//! Legality is decided by simulation: every candidate is played on a copy of
//! the board and rejected if it leaves the mover's king attacked. No pin or
//! ray precomputation, so the cost is one board scan per candidate.
use crate::attacks::raw_moves;
use crate::boards::*;
use crate::moves::*;
use crate::pieces::*;
use crate::positions::*;

/// True if any opposing piece could move onto the king of `color`.
/// A board without such a king is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    let king_pos = match board.find_king(color) {
        Some(p) => p,
        None => return false,
    };
    board
        .pieces_of(color.opposite())
        .any(|enemy| raw_moves(enemy, enemy.position, board).contains(&king_pos))
}

/// Destinations of the piece on `pos` that do not leave its own king in check.
/// Empty if the square is empty.
pub fn legal_moves(board: &Board, pos: Position) -> Vec<Position> {
    let piece = match board.piece_at(pos) {
        Some(p) => p,
        None => return Vec::new(),
    };

    raw_moves(piece, pos, board)
        .into_iter()
        .filter(|&dest| {
            let mut hypothetical = board.clone();
            hypothetical
                .make_move(Move::new(pos, dest))
                .map_or(false, |_| !in_check(&hypothetical, piece.color))
        })
        .collect()
}

/// Every legal move of `color`, ordered by origin square (row-major) and then
/// by generator order.
pub fn legal_moves_for(board: &Board, color: Color) -> Vec<Move> {
    let mut res = Vec::new();
    for pos in Position::all_positions() {
        if board.piece_at(pos).map_or(false, |p| p.color == color) {
            res.extend(
                legal_moves(board, pos)
                    .into_iter()
                    .map(|dest| Move::new(pos, dest)),
            );
        }
    }
    res
}

pub fn has_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|p| !legal_moves(board, p.position).is_empty())
}

/// In check with no legal reply. A side that cannot move while not in check
/// is not reported here.
pub fn is_checkmate(board: &Board, color: Color) -> bool {
    in_check(board, color) && !has_legal_move(board, color)
}
