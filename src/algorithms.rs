use crate::boards::Board;
use crate::moves::Move;
use crate::pieces::Color;
use crate::positions::Position;
use crate::rules::legal_moves;
use std::cmp::{max, min};

pub type Score = i32;

/// Bound on every evaluation. A side left without a legal move scores it
/// against itself.
pub const SCORE_INFINITY: Score = Score::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// From the searching side's point of view
    pub score: Score,
    /// None if the searching side has no legal move, or at depth 0
    pub best_move: Option<Move>,
    pub nodes: u64,
}

/// Fixed-depth minimax with alpha-beta pruning. Implementors only supply the
/// static evaluation.
pub trait AlphaBetaSearch {
    /// Static evaluation. Positive is good for white.
    fn score(&self, board: &Board) -> Score;

    fn score_for(&self, board: &Board, perspective: Color) -> Score {
        let s = self.score(board);
        match perspective {
            Color::White => s,
            Color::Black => -s,
        }
    }

    /// Searches `depth` plies for `perspective`, which is to move. The board
    /// is used as scratch space and is restored before returning.
    fn search(&self, board: &mut Board, perspective: Color, depth: u8) -> SearchResult {
        let mut nodes = 0;
        let (score, best_move) = self.minimax(
            board,
            depth,
            -SCORE_INFINITY,
            SCORE_INFINITY,
            true,
            perspective,
            &mut nodes,
        );
        SearchResult {
            score,
            best_move,
            nodes,
        }
    }

    /// Moves are tried in row-major order of their origin square, then in
    /// generator order. Only a strictly better score replaces the current
    /// best, so the first of several equal moves is kept.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &mut Board,
        depth: u8,
        alpha: Score,
        beta: Score,
        maximizing: bool,
        perspective: Color,
        nodes: &mut u64,
    ) -> (Score, Option<Move>) {
        *nodes += 1;
        if depth == 0 {
            return (self.score_for(board, perspective), None);
        }

        let to_move = if maximizing {
            perspective
        } else {
            perspective.opposite()
        };

        let mut alpha_ = alpha;
        let mut beta_ = beta;
        let mut best_val = if maximizing {
            -SCORE_INFINITY
        } else {
            SCORE_INFINITY
        };
        let mut best_move = None;

        'siblings: for start in Position::all_positions() {
            if board.piece_at(start).map_or(true, |p| p.color != to_move) {
                continue;
            }

            for end in legal_moves(board, start) {
                let mv = Move::new(start, end);
                let record = match board.make_move(mv) {
                    Ok(record) => record,
                    Err(_) => continue,
                };
                let (val, _) =
                    self.minimax(board, depth - 1, alpha_, beta_, !maximizing, perspective, nodes);
                board.unmake_move(&record);

                let improves = if maximizing {
                    val > best_val
                } else {
                    val < best_val
                };
                if best_move.is_none() || improves {
                    best_val = val;
                    best_move = Some(mv);
                }

                if maximizing {
                    alpha_ = max(alpha_, val);
                } else {
                    beta_ = min(beta_, val);
                }
                if beta_ <= alpha_ {
                    break 'siblings;
                }
            }
        }
        (best_val, best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StandardEngine;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn mv(from: &str, to: &str) -> Move {
        Move::new(pos(from), pos(to))
    }

    fn play(board: &mut Board, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            board.make_move(mv(from, to)).unwrap();
        }
    }

    /// Plain minimax, same ordering and tie-break, no pruning.
    fn exhaustive<E: AlphaBetaSearch>(
        engine: &E,
        board: &mut Board,
        depth: u8,
        maximizing: bool,
        perspective: Color,
    ) -> (Score, Option<Move>) {
        if depth == 0 {
            return (engine.score_for(board, perspective), None);
        }
        let to_move = if maximizing {
            perspective
        } else {
            perspective.opposite()
        };
        let mut best_val = if maximizing {
            -SCORE_INFINITY
        } else {
            SCORE_INFINITY
        };
        let mut best_move = None;
        for start in Position::all_positions() {
            if board.piece_at(start).map_or(true, |p| p.color != to_move) {
                continue;
            }
            for end in legal_moves(board, start) {
                let m = Move::new(start, end);
                let record = board.make_move(m).unwrap();
                let (val, _) = exhaustive(engine, board, depth - 1, !maximizing, perspective);
                board.unmake_move(&record);
                let improves = if maximizing {
                    val > best_val
                } else {
                    val < best_val
                };
                if best_move.is_none() || improves {
                    best_val = val;
                    best_move = Some(m);
                }
            }
        }
        (best_val, best_move)
    }

    fn italian_game() -> Board {
        let mut b = Board::standard_setup();
        play(
            &mut b,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("g1", "f3"),
                ("b8", "c6"),
                ("f1", "c4"),
                ("g8", "f6"),
                ("d2", "d4"),
                ("e5", "d4"),
            ],
        );
        b
    }

    #[test]
    fn test_alphabeta_matches_exhaustive_minimax() {
        let engine = StandardEngine;
        for color in [Color::White, Color::Black] {
            for depth in 1..=2 {
                let mut b = italian_game();
                let pruned = engine.search(&mut b, color, depth);
                let full = exhaustive(&engine, &mut b, depth, true, color);
                assert_eq!(pruned.score, full.0, "{:?} depth {}", color, depth);
                assert_eq!(pruned.best_move, full.1, "{:?} depth {}", color, depth);
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let mut b = italian_game();
        let depth_one = StandardEngine.search(&mut b, Color::White, 1);
        let depth_two = StandardEngine.search(&mut b, Color::White, 2);
        // Without pruning depth two visits every reply of every move
        assert!(depth_two.nodes > depth_one.nodes);
        let legal_replies: u64 = crate::rules::legal_moves_for(&b, Color::White)
            .into_iter()
            .map(|m| {
                let mut child = b.clone();
                child.make_move(m).unwrap();
                crate::rules::legal_moves_for(&child, Color::Black).len() as u64 + 1
            })
            .sum();
        assert!(depth_two.nodes < legal_replies + 1);
    }

    #[test]
    fn test_search_restores_board() {
        let mut b = italian_game();
        let before = b.clone();
        StandardEngine.search(&mut b, Color::Black, 2);
        assert_eq!(b, before);
    }

    #[test]
    fn test_depth_zero_returns_static_score() {
        let mut b = italian_game();
        let res = StandardEngine.search(&mut b, Color::Black, 0);
        assert_eq!(res.best_move, None);
        assert_eq!(res.score, -crate::engine::evaluate(&b));
    }

    #[test]
    fn test_finds_mate_in_one() {
        let mut b = Board::standard_setup();
        play(&mut b, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4")]);
        let res = StandardEngine.search(&mut b, Color::Black, 2);
        assert_eq!(res.best_move, Some(mv("d8", "h4")));
        assert_eq!(res.score, SCORE_INFINITY);
    }

    #[test]
    fn test_captures_hanging_queen() {
        // Kings boxed in the corners, so no quiet move changes the centre bonus
        let mut b: Board = "
            k.......
            pp......
            ........
            ...q....
            ........
            ..N.....
            ......PP
            .......K"
            .parse()
            .unwrap();
        let res = StandardEngine.search(&mut b, Color::White, 1);
        assert_eq!(res.best_move, Some(mv("c3", "d5")));
        assert_eq!(res.score, 48);

        // Same position seen from black: the queen leaves the knight's reach
        let res = StandardEngine.search(&mut b, Color::Black, 2);
        let escape = res.best_move.unwrap();
        assert_eq!(escape.start, pos("d5"));
        let mut after = b.clone();
        after.make_move(escape).unwrap();
        let knight = *after.piece_at(pos("c3")).unwrap();
        let reach = crate::attacks::raw_moves(&knight, pos("c3"), &after);
        assert!(!reach.contains(&escape.end));
        assert!(res.score > 0);
    }

    #[test]
    fn test_no_move_when_mated() {
        let mut b: Board = "
            R.....k.
            .....ppp
            ........
            ........
            ........
            ........
            ........
            ......K."
            .parse()
            .unwrap();
        let res = StandardEngine.search(&mut b, Color::Black, 2);
        assert_eq!(res.best_move, None);
        assert_eq!(res.score, -SCORE_INFINITY);
    }

    struct Indifferent;

    impl AlphaBetaSearch for Indifferent {
        fn score(&self, _board: &Board) -> Score {
            0
        }
    }

    #[test]
    fn test_first_equal_move_wins() {
        let mut b = Board::standard_setup();
        for depth in 1..=2 {
            let res = Indifferent.search(&mut b, Color::White, depth);
            assert_eq!(res.best_move, Some(mv("a2", "a3")));
            let res = Indifferent.search(&mut b, Color::Black, depth);
            assert_eq!(res.best_move, Some(mv("b8", "c6")));
        }
    }
}
