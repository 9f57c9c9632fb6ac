use crate::boards::*;
use crate::chess_errors::*;
use crate::moves::*;
use crate::pieces::*;
use crate::positions::*;
use crate::rules::{in_check, is_checkmate, legal_moves};
use std::fmt::{self, Display};
use tracing::{debug, info};

pub const MIN_SEARCH_DEPTH: u8 = 1;
pub const MAX_SEARCH_DEPTH: u8 = 5;
pub const DEFAULT_SEARCH_DEPTH: u8 = 2;

// -------------------------------------
// GameState
// ------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The given side is to move and in check
    Check(Color),
    Checkmate { winner: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub piece: Piece,
    pub origin: Position,
}

/// What a click did. Rejected input is reported, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected,
    Moved(MoveRecord),
    /// A selection existed and the click was not one of its destinations
    Deselected,
    /// Nothing selectable on the clicked square
    Ignored,
    /// A search is running, the board is not available
    Busy,
}

/// Setup of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub automated_opponent: bool,
    pub opponent: Color,
    pub search_depth: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            automated_opponent: false,
            opponent: Color::Black,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

pub const ENV_AI: &str = "CHESSDUEL_AI";
pub const ENV_OPPONENT: &str = "CHESSDUEL_OPPONENT";
pub const ENV_DEPTH: &str = "CHESSDUEL_DEPTH";

impl GameConfig {
    /// Reads `CHESSDUEL_AI`, `CHESSDUEL_OPPONENT` and `CHESSDUEL_DEPTH`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> ChessResult<GameConfig> {
        GameConfig::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ChessResult<GameConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let invalid = |key: &str, value: &str| ChessError::Config {
            key: key.to_string(),
            value: value.to_string(),
        };
        let mut config = GameConfig::default();

        if let Some(value) = lookup(ENV_AI) {
            config.automated_opponent = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "on" | "true" | "yes" => true,
                "0" | "off" | "false" | "no" => false,
                _ => return Err(invalid(ENV_AI, &value)),
            };
        }
        if let Some(value) = lookup(ENV_OPPONENT) {
            config.opponent = match value.trim().to_ascii_lowercase().as_str() {
                "white" => Color::White,
                "black" => Color::Black,
                _ => return Err(invalid(ENV_OPPONENT, &value)),
            };
        }
        if let Some(value) = lookup(ENV_DEPTH) {
            let depth: u8 = value
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_DEPTH, &value))?;
            config.search_depth = depth.clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH);
        }
        Ok(config)
    }
}

/// A Game State is an object that represents one game session.
/// Implements the player commands (select, confirm, undo) on top of the
/// board, together with move history and the automated opponent's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Color,
    history: Vec<MoveRecord>,
    selection: Option<Selection>,
    // Legal destinations of the selected piece, recomputed on every selection
    destinations: Vec<Position>,
    status: GameStatus,
    automated_opponent: bool,
    opponent: Color,
    search_depth: u8,
}

impl GameState {
    /// Returns a game with the figures placed on standard chess starting positions
    pub fn standard_setup() -> GameState {
        GameState::new(GameConfig::default())
    }

    pub fn new(config: GameConfig) -> GameState {
        let mut state = GameState::from_board(Board::standard_setup(), Color::White);
        state.automated_opponent = config.automated_opponent;
        state.opponent = config.opponent;
        state.search_depth = config.search_depth.clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH);
        state
    }

    /// Starts a session from an arbitrary position with `to_move` to play.
    pub fn from_board(board: Board, to_move: Color) -> GameState {
        let mut state = GameState {
            board,
            current_player: to_move,
            history: Vec::new(),
            selection: None,
            destinations: Vec::new(),
            status: GameStatus::InProgress,
            automated_opponent: false,
            opponent: Color::Black,
            search_depth: DEFAULT_SEARCH_DEPTH,
        };
        state.refresh_status();
        state
    }
}

// Queries
impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get_current_player(&self) -> Color {
        self.current_player
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn legal_destinations(&self) -> &[Position] {
        &self.destinations
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Checkmate { .. })
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn automated_opponent_enabled(&self) -> bool {
        self.automated_opponent
    }

    pub fn opponent(&self) -> Color {
        self.opponent
    }

    pub fn search_depth(&self) -> u8 {
        self.search_depth
    }

    /// True if the automated opponent should be thinking now.
    pub fn opponent_to_move(&self) -> bool {
        self.automated_opponent && self.current_player == self.opponent && !self.is_over()
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            GameStatus::InProgress => String::new(),
            GameStatus::Check(color) => format!("  {} is in check", color),
            GameStatus::Checkmate { winner } => format!("  Checkmate, {} wins", winner),
        };
        write!(
            f,
            "Move: {}  Player: {}{}\n{}",
            self.history.len(),
            self.current_player,
            status,
            self.board
        )
    }
}

// -------------------------------------
// Player commands
// ------------------------------------

impl GameState {
    /// Routes a click to `select` when nothing is selected, to `confirm`
    /// otherwise.
    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        if self.selection.is_none() {
            if self.select(pos) {
                ClickOutcome::Selected
            } else {
                ClickOutcome::Ignored
            }
        } else {
            match self.confirm(pos) {
                Some(record) => ClickOutcome::Moved(record),
                None => ClickOutcome::Deselected,
            }
        }
    }

    /// Selects the piece on `pos` if it belongs to the side to move and caches
    /// its legal destinations. Returns false (and changes nothing) otherwise.
    pub fn select(&mut self, pos: Position) -> bool {
        if self.selection.is_some() {
            return false;
        }
        let piece = match self.board.piece_at(pos) {
            Some(p) if p.color == self.current_player => *p,
            _ => return false,
        };

        self.destinations = legal_moves(&self.board, pos);
        self.selection = Some(Selection { piece, origin: pos });
        debug!(
            "Selected {} on {}, {} legal destinations",
            piece.kind.algebraic(),
            pos,
            self.destinations.len()
        );
        true
    }

    /// Moves the selected piece to `pos` if that is one of its legal
    /// destinations. The selection is cleared either way.
    pub fn confirm(&mut self, pos: Position) -> Option<MoveRecord> {
        let selection = self.selection.take()?;
        let destinations = std::mem::take(&mut self.destinations);
        if !destinations.contains(&pos) {
            debug!("{} is not a legal destination, deselecting", pos);
            return None;
        }
        self.apply_move(Move::new(selection.origin, pos), false).ok()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.destinations.clear();
    }

    /// The one path that changes the position: make the move, record it, hand
    /// the turn over and work out check and checkmate for the side now to
    /// move. Legality is the caller's business.
    pub fn apply_move(&mut self, mv: Move, automated: bool) -> ChessResult<MoveRecord> {
        let mut record = self.board.make_move(mv)?;
        record.automated = automated;
        self.history.push(record);
        self.current_player = self.current_player.opposite();
        self.selection = None;
        self.destinations.clear();

        info!(
            "{} plays {}{}",
            record.color(),
            record,
            if automated { " (automated)" } else { "" }
        );
        self.refresh_status();
        Ok(record)
    }

    /// Takes back the latest move: the mover returns to its origin as it was
    /// (position and `has_moved`), a captured piece returns to the
    /// destination, and the turn goes back. No-op on an empty history.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.board.unmake_move(&record);
        self.current_player = self.current_player.opposite();
        self.selection = None;
        self.destinations.clear();
        debug!("Took back {}", record);
        self.refresh_status();
        Some(record)
    }

    fn refresh_status(&mut self) {
        let side = self.current_player;
        self.status = if is_checkmate(&self.board, side) {
            info!("Checkmate! {} wins!", side.opposite());
            GameStatus::Checkmate {
                winner: side.opposite(),
            }
        } else if in_check(&self.board, side) {
            info!("Check! {} is in check.", side);
            GameStatus::Check(side)
        } else {
            GameStatus::InProgress
        };
    }
}

// -------------------------------------
// Automated opponent settings
// ------------------------------------

impl GameState {
    pub fn toggle_automated_opponent(&mut self) -> bool {
        self.automated_opponent = !self.automated_opponent;
        info!(
            "Automated opponent {}",
            if self.automated_opponent { "on" } else { "off" }
        );
        self.automated_opponent
    }

    /// Only effective while the automated opponent is enabled.
    pub fn increase_depth(&mut self) -> u8 {
        if self.automated_opponent && self.search_depth < MAX_SEARCH_DEPTH {
            self.search_depth += 1;
        }
        self.search_depth
    }

    /// Only effective while the automated opponent is enabled.
    pub fn decrease_depth(&mut self) -> u8 {
        if self.automated_opponent && self.search_depth > MIN_SEARCH_DEPTH {
            self.search_depth -= 1;
        }
        self.search_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions;
    use crate::rules::legal_moves_for;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn play(g: &mut GameState, from: &str, to: &str) -> MoveRecord {
        assert_eq!(g.click(pos(from)), ClickOutcome::Selected);
        match g.click(pos(to)) {
            ClickOutcome::Moved(record) => record,
            other => panic!("{}{} was not played: {:?}", from, to, other),
        }
    }

    #[test]
    fn test_standard_setup() {
        let g = GameState::standard_setup();
        assert_eq!(g.get_current_player(), Color::White);
        assert!(g.history().is_empty());
        assert_eq!(g.selection(), None);
        assert_eq!(g.status(), GameStatus::InProgress);
        assert!(!g.automated_opponent_enabled());
        assert_eq!(g.search_depth(), DEFAULT_SEARCH_DEPTH);
        assert_eq!(g.opponent(), Color::Black);
    }

    #[test]
    fn test_select_own_piece() {
        let mut g = GameState::standard_setup();
        assert!(g.select(pos("g1")));
        let selection = g.selection().unwrap();
        assert_eq!(selection.origin, pos("g1"));
        assert_eq!(selection.piece.kind, PieceType::Knight);
        assert_eq!(g.legal_destinations(), positions!("h3", "f3").as_slice());
    }

    #[test]
    fn test_select_rejected() {
        let mut g = GameState::standard_setup();
        // Opponent's piece
        assert_eq!(g.click(pos("e7")), ClickOutcome::Ignored);
        // Empty square
        assert_eq!(g.click(pos("e4")), ClickOutcome::Ignored);
        assert_eq!(g.selection(), None);
        assert!(g.legal_destinations().is_empty());
    }

    #[test]
    fn test_select_only_without_selection() {
        let mut g = GameState::standard_setup();
        assert!(g.select(pos("e2")));
        assert!(!g.select(pos("d2")));
        assert_eq!(g.selection().unwrap().origin, pos("e2"));
    }

    #[test]
    fn test_illegal_confirm_just_deselects() {
        let mut g = GameState::standard_setup();
        let before = g.clone();
        g.click(pos("e2"));
        assert_eq!(g.click(pos("e5")), ClickOutcome::Deselected);
        assert_eq!(g, before);

        // Clicking another own piece is also just a deselect
        g.click(pos("e2"));
        assert_eq!(g.click(pos("d2")), ClickOutcome::Deselected);
        assert_eq!(g.selection(), None);
    }

    #[test]
    fn test_simple_move() {
        let mut g = GameState::standard_setup();
        let record = play(&mut g, "e2", "e4");
        assert_eq!(record.mv, Move::new(pos("e2"), pos("e4")));
        assert_eq!(record.captured, None);
        assert!(!record.automated);
        assert_eq!(g.get_current_player(), Color::Black);
        assert_eq!(g.history().len(), 1);
        assert_eq!(g.selection(), None);
        assert!(g.legal_destinations().is_empty());

        let pawn = g.board().piece_at(pos("e4")).unwrap();
        assert!(pawn.has_moved);
        assert_eq!(pawn.position, pos("e4"));
    }

    #[test]
    fn test_capture_and_undo() {
        let mut g = GameState::standard_setup();
        play(&mut g, "e2", "e4");
        play(&mut g, "d7", "d5");
        let before = g.clone();
        let record = play(&mut g, "e4", "d5");
        assert_eq!(record.captured.map(|p| p.kind), Some(PieceType::Pawn));
        assert_eq!(g.board().pieces_of(Color::Black).count(), 15);

        assert_eq!(g.undo(), Some(record));
        assert_eq!(g, before);
    }

    #[test]
    fn test_undo_empty_history() {
        let mut g = GameState::standard_setup();
        let before = g.clone();
        assert_eq!(g.undo(), None);
        assert_eq!(g, before);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut g = GameState::standard_setup();
        play(&mut g, "e2", "e4");
        g.click(pos("e7"));
        g.undo();
        assert_eq!(g.selection(), None);
        assert_eq!(g.get_current_player(), Color::White);
    }

    #[test]
    fn test_fools_mate() {
        let mut g = GameState::standard_setup();
        play(&mut g, "f2", "f3");
        play(&mut g, "e7", "e5");
        play(&mut g, "g2", "g4");
        assert_eq!(g.status(), GameStatus::InProgress);
        play(&mut g, "d8", "h4");
        assert_eq!(g.status(), GameStatus::Checkmate { winner: Color::Black });
        assert!(g.is_over());
        assert_eq!(g.winner(), Some(Color::Black));

        // No white piece has anywhere to go
        for square in ["e1", "e2", "g1", "h2"] {
            assert_eq!(g.click(pos(square)), ClickOutcome::Selected);
            assert!(g.legal_destinations().is_empty());
            assert_eq!(g.click(pos("e3")), ClickOutcome::Deselected);
        }

        g.undo();
        assert!(!g.is_over());
        assert_eq!(g.winner(), None);
    }

    #[test]
    fn test_check_status() {
        let mut g = GameState::standard_setup();
        play(&mut g, "e2", "e4");
        play(&mut g, "f7", "f6");
        play(&mut g, "d1", "h5");
        assert_eq!(g.status(), GameStatus::Check(Color::Black));
        assert!(!g.is_over());
        play(&mut g, "g7", "g6");
        assert_eq!(g.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_from_board_detects_mate() {
        let b: Board = "
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
        let g = GameState::from_board(b, Color::Black);
        assert_eq!(g.winner(), Some(Color::White));
    }

    #[test]
    fn test_depth_adjustments() {
        let mut g = GameState::standard_setup();
        // Ignored while the opponent is off
        assert_eq!(g.increase_depth(), DEFAULT_SEARCH_DEPTH);
        assert_eq!(g.decrease_depth(), DEFAULT_SEARCH_DEPTH);

        assert!(g.toggle_automated_opponent());
        for _ in 0..10 {
            g.increase_depth();
        }
        assert_eq!(g.search_depth(), MAX_SEARCH_DEPTH);
        for _ in 0..10 {
            g.decrease_depth();
        }
        assert_eq!(g.search_depth(), MIN_SEARCH_DEPTH);
        assert!(!g.toggle_automated_opponent());
    }

    #[test]
    fn test_config_depth_is_clamped() {
        let g = GameState::new(GameConfig {
            automated_opponent: true,
            opponent: Color::White,
            search_depth: 9,
        });
        assert_eq!(g.search_depth(), MAX_SEARCH_DEPTH);
        assert_eq!(g.opponent(), Color::White);
        assert!(g.opponent_to_move());

        let g = GameState::new(GameConfig {
            search_depth: 0,
            ..GameConfig::default()
        });
        assert_eq!(g.search_depth(), MIN_SEARCH_DEPTH);
        assert!(!g.opponent_to_move());
    }

    #[test]
    fn test_config_from_lookup() {
        use std::collections::HashMap;

        let vars: HashMap<&str, &str> = [(ENV_AI, "on"), (ENV_OPPONENT, "White"), (ENV_DEPTH, "7")]
            .into_iter()
            .collect();
        let config = GameConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(
            config,
            GameConfig {
                automated_opponent: true,
                opponent: Color::White,
                search_depth: MAX_SEARCH_DEPTH,
            }
        );

        assert_eq!(GameConfig::from_lookup(|_| None).unwrap(), GameConfig::default());

        let err = GameConfig::from_lookup(|k| (k == ENV_DEPTH).then(|| "deep".to_string()));
        assert_eq!(
            err,
            Err(ChessError::Config {
                key: ENV_DEPTH.to_string(),
                value: "deep".to_string()
            })
        );
        assert!(GameConfig::from_lookup(|k| (k == ENV_AI).then(|| "maybe".to_string())).is_err());
    }

    #[test]
    fn test_make_undo_random_moves() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut g = GameState::standard_setup();

        for _ in 0..60 {
            let moves = legal_moves_for(g.board(), g.get_current_player());
            let mv = match moves.choose(&mut rng) {
                Some(mv) => *mv,
                None => break,
            };
            let prev = g.clone();
            g.click(mv.start);
            assert!(matches!(g.click(mv.end), ClickOutcome::Moved(_)));
            g.undo();
            assert_eq!(g, prev, "\nCouldn't undo move {}\n", mv);

            g.click(mv.start);
            g.click(mv.end);
        }
    }
}
