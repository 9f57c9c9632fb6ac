use crate::chess_errors::*;
use crate::moves::*;
use crate::pieces::*;
use crate::positions::*;
use array_init::array_init;
use std::fmt::{self, Display};
use std::ops;
use std::str::FromStr;

// ---------------------------------------------
// Board Types
// ---------------------------------------------

const BACK_RANK: [PieceType; BOARD_SIZE as usize] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

// Displays the first 64 items from an iterator in a chessboard style:
//
//   a  b  c  d  e  f  g
// 8 i1 i2 i3 ...        8
// 7 ....
//
// Where i1,...i64 are the items of the iterator.
// It is required that the iterator has at least 64 items, else we will return with an error.
fn display_chessboard_style<I, C>(it: &mut I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: Iterator<Item = C>,
    C: Display,
{
    write!(f, " ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    for row in 0..BOARD_SIZE {
        write!(f, "\n{} ", 8 - row)?;
        for _col in 0..BOARD_SIZE {
            let i = it.next().ok_or(fmt::Error)?;
            write!(f, "{} ", i)?;
        }
        write!(f, "{} ", 8 - row)?;
    }
    write!(f, "\n ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    Ok(())
}

/// Mailbox board: every square owns at most one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: array_init(|_| array_init(|_| None)),
        }
    }

    /// Returns a board with the figures placed on standard chess starting positions
    pub fn standard_setup() -> Board {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for col in 0..BOARD_SIZE {
                let pawn = Position::from_row_col(color.pawn_start_row(), col);
                let officer = Position::from_row_col(color.back_row(), col);
                board[pawn] = Some(Piece::new(color, PieceType::Pawn, pawn));
                board[officer] = Some(Piece::new(color, BACK_RANK[col as usize], officer));
            }
        }
        board
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self[pos].as_ref()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self[pos].is_none()
    }

    /// Puts a piece on the square named by its position. Fails if the square
    /// is taken.
    pub fn place(&mut self, piece: Piece) -> ChessResult<()> {
        let current = &mut self[piece.position];
        if current.is_some() {
            return Err(ChessError::Occupied(piece.position));
        }
        *current = Some(piece);
        Ok(())
    }

    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self[pos].take()
    }

    /// All pieces in row-major order, a8 first.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.squares.iter().flatten().flatten()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Locates the king of the given color. A board built by hand may have
    /// none.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|p| p.kind == PieceType::King)
            .map(|p| p.position)
    }

    /// Moves the piece at `mv.start` to `mv.end`, capturing any occupant.
    /// Does NOT check whether the move obeys the rules.
    pub fn make_move(&mut self, mv: Move) -> ChessResult<MoveRecord> {
        let piece = self[mv.start]
            .take()
            .ok_or(ChessError::EmptySquare(mv.start))?;
        let moved = Piece {
            position: mv.end,
            has_moved: true,
            ..piece
        };
        let captured = self[mv.end].replace(moved);
        Ok(MoveRecord {
            mv,
            piece,
            captured,
            automated: false,
        })
    }

    /// Reverse operation to make_move. The record must be the latest move
    /// made on this board.
    pub fn unmake_move(&mut self, record: &MoveRecord) {
        debug_assert!(
            self[record.mv.end].map(|p| p.color) == Some(record.piece.color),
            "\nUnmaking {} but the mover is not on {}\n{}",
            record,
            record.mv.end,
            self
        );
        self[record.mv.end] = record.captured;
        self[record.mv.start] = Some(record.piece);
    }

    /// Writes the board in the diagram format read by `FromStr`, one rank
    /// per line, rank 8 first.
    pub fn diagram(&self) -> String {
        self.squares
            .iter()
            .map(|row| {
                row.iter()
                    .map(|sq| sq.map_or('.', |p| p.letter()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::standard_setup()
    }
}

impl ops::Index<Position> for Board {
    type Output = Option<Piece>;

    fn index(&self, pos: Position) -> &Option<Piece> {
        &self.squares[pos.row() as usize][pos.col() as usize]
    }
}

impl ops::IndexMut<Position> for Board {
    fn index_mut(&mut self, pos: Position) -> &mut Option<Piece> {
        &mut self.squares[pos.row() as usize][pos.col() as usize]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells = self.squares.iter().flatten().map(|sq| match sq {
            Some(piece) => piece.to_string(),
            None => "\u{00b7}".to_string(),
        });
        display_chessboard_style(&mut cells, f)
    }
}

/// Reads a board diagram: eight rows from rank 8 down to rank 1, `KQRBNP` for
/// white, lowercase for black and `.` for an empty square. Whitespace is
/// ignored.
impl FromStr for Board {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != (BOARD_SIZE * BOARD_SIZE) as usize {
            return Err(ChessError::InvalidDiagram(format!(
                "expected 64 squares, found {}",
                cells.len()
            )));
        }

        let mut board = Board::empty();
        for (pos, c) in Position::all_positions().zip(cells) {
            if c == '.' {
                continue;
            }
            let kind = PieceType::from_algebraic(c)
                .ok_or_else(|| ChessError::InvalidDiagram(format!("unknown piece {:?}", c)))?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            board.place(Piece::new(color, kind, pos))?;
        }
        Ok(board)
    }
}
