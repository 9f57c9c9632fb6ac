use crate::positions::Position;
use thiserror::Error;

// ---------------------------------------------
// Error Handling
// ---------------------------------------------

/// Errors for the fallible edges of the crate. Game commands themselves never
/// fail, invalid input there is absorbed as a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Invalid chess position {0}")]
    InvalidPosition(String),

    #[error("Invalid board diagram: {0}")]
    InvalidDiagram(String),

    #[error("No piece at {0}")]
    EmptySquare(Position),

    #[error("Square {0} is already occupied")]
    Occupied(Position),

    #[error("Unknown command {0:?}")]
    UnknownCommand(String),

    #[error("Invalid value {value:?} for {key}")]
    Config { key: String, value: String },
}

pub type ChessResult<T> = std::result::Result<T, ChessError>;
