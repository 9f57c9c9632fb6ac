#[macro_use]
extern crate impl_ops;

pub mod algorithms;
pub mod attacks;
pub mod boards;
pub mod chess_errors;
pub mod engine;
pub mod game;
pub mod game_state;
pub mod moves;
pub mod pieces;
pub mod positions;
pub mod rules;
pub mod utils;

pub use boards::Board;
pub use chess_errors::{ChessError, ChessResult};
pub use game::{Game, SearchReport};
pub use game_state::{ClickOutcome, GameConfig, GameState, GameStatus};
pub use moves::{Move, MoveRecord};
pub use pieces::{Color, Piece, PieceType};
pub use positions::Position;
