// For testing purposes: Easily creates a list of positions from algebraic names.
// Not very efficient.
#[macro_export]
macro_rules! positions {
    ( $( $x:expr ),* ) => {
        {
            #[allow(unused_mut)]
            let mut base: Vec<$crate::positions::Position> = Vec::new();
            $(
                base.push(
                    $x.parse::<$crate::positions::Position>()
                        .expect("Invalid position literal"),
                );
            )*
            base
        }
    };
}

// Functions relevant for tests
#[cfg(test)]
use crate::{boards::Board, moves::Move, pieces::Color, rules::legal_moves_for};

/// Plays a uniformly chosen legal move for `color`. Returns None if there is
/// none.
#[cfg(test)]
pub fn play_random_legal_move(board: &mut Board, color: Color, r: &mut impl rand::Rng) -> Option<Move> {
    use rand::seq::SliceRandom;
    let moves = legal_moves_for(board, color);
    let mv = *moves.choose(r)?;
    board.make_move(mv).ok()?;
    Some(mv)
}
