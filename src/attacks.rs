use crate::boards::*;
use crate::pieces::*;
use crate::positions::*;

// For most of this, a board with positions will be helpful for visualizations.
// Rows grow downwards, so white pawns walk towards row 0:
//
//     a   b   c   d   e   f   g   h
//    --------------------------------
// 8 | 0   1   2   3   4   5   6   7  | 8
// 7 | 8   9   10  11  12  13  14  15 | 7
// ...
// 1 | 56  57  58  59  60  61  62  63 | 1
//    --------------------------------
//
// The emission order of every generator below is part of the search
// tie-break: the first best move found wins.

const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset::new(2, 1),
    Offset::new(2, -1),
    Offset::new(-2, 1),
    Offset::new(-2, -1),
    Offset::new(1, 2),
    Offset::new(1, -2),
    Offset::new(-1, 2),
    Offset::new(-1, -2),
];

const KING_OFFSETS: [Offset; 8] = [
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(1, -1),
    Offset::new(1, 0),
    Offset::new(1, 1),
];

const DIAGONALS: [Offset; 4] = [
    Offset::new(1, 1),
    Offset::new(1, -1),
    Offset::new(-1, 1),
    Offset::new(-1, -1),
];

const ORTHOGONALS: [Offset; 4] = [
    Offset::new(0, 1),
    Offset::new(0, -1),
    Offset::new(1, 0),
    Offset::new(-1, 0),
];

const QUEEN_RAYS: [Offset; 8] = [
    DIAGONALS[0],
    DIAGONALS[1],
    DIAGONALS[2],
    DIAGONALS[3],
    ORTHOGONALS[0],
    ORTHOGONALS[1],
    ORTHOGONALS[2],
    ORTHOGONALS[3],
];

// ---------------------------------------------------------------------
// Pseudo-legal move generation
// ---------------------------------------------------------------------

/// Returns the squares the piece standing on `pos` can move to. Moves are only
/// possible due to piece movement rules, not necessarily legal (might leave
/// king in check).
pub fn raw_moves(piece: &Piece, pos: Position, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceType::Pawn => pawn_moves(piece.color, pos, board),
        PieceType::Knight => jumping_moves(piece.color, pos, board, &KNIGHT_OFFSETS),
        PieceType::Bishop => gliding_moves(piece.color, pos, board, &DIAGONALS),
        PieceType::Rook => gliding_moves(piece.color, pos, board, &ORTHOGONALS),
        PieceType::Queen => gliding_moves(piece.color, pos, board, &QUEEN_RAYS),
        PieceType::King => jumping_moves(piece.color, pos, board, &KING_OFFSETS),
    }
}

/// True if `target` is on the board and holds no piece of `color`.
fn free_or_enemy(board: &Board, target: Position, color: Color) -> bool {
    board.piece_at(target).map_or(true, |p| p.color != color)
}

fn pawn_moves(color: Color, pos: Position, board: &Board) -> Vec<Position> {
    let mut res = Vec::with_capacity(4);
    let dir = color.pawn_direction();

    if let Some(one) = pos + Offset::new(dir, 0) {
        if board.is_empty_at(one) {
            res.push(one);
            if pos.row() == color.pawn_start_row() {
                if let Some(two) = one + Offset::new(dir, 0) {
                    if board.is_empty_at(two) {
                        res.push(two);
                    }
                }
            }
        }
    }

    // Captures
    for side in [-1, 1] {
        if let Some(target) = pos + Offset::new(dir, side) {
            if board.piece_at(target).map_or(false, |p| p.color != color) {
                res.push(target);
            }
        }
    }
    res
}

/// Knight and King: fixed offsets, no blocking.
fn jumping_moves(color: Color, pos: Position, board: &Board, offsets: &[Offset]) -> Vec<Position> {
    offsets
        .iter()
        .filter_map(|o| pos + o)
        .filter(|&target| free_or_enemy(board, target, color))
        .collect()
}

/// Bishop, Rook and Queen: walk each ray until the edge or the first piece,
/// which is included only if it can be captured.
fn gliding_moves(color: Color, pos: Position, board: &Board, rays: &[Offset]) -> Vec<Position> {
    let mut res = Vec::new();
    for ray in rays {
        let mut current = pos;
        while let Some(next) = current + ray {
            match board.piece_at(next) {
                None => res.push(next),
                Some(blocker) => {
                    if blocker.color != color {
                        res.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    res
}
