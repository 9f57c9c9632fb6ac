//! Runs the automated opponent next to interactive play.
//!
//! The live board belongs to the foreground. A search gets its own copy of the
//! board, moved into a background thread, and sends its result back over a
//! channel. While a search is in flight the foreground refuses every command
//! that would touch the board, so the result is always computed on the
//! position it is applied to.
use crate::algorithms::{AlphaBetaSearch, SearchResult};
use crate::engine::StandardEngine;
use crate::game_state::*;
use crate::pieces::Color;
use crate::positions::Position;
use crate::rules::legal_moves;
use std::any::Any;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub result: SearchResult,
    pub color: Color,
    pub depth: u8,
    pub elapsed: Duration,
    /// Whether the move was played on the live board
    pub applied: bool,
}

struct PendingSearch {
    rx: mpsc::Receiver<SearchReport>,
    join: Option<JoinHandle<()>>,
    // History length when the search was launched
    ply: usize,
}

/// A game session with an optional automated opponent.
pub struct Game<E: AlphaBetaSearch = StandardEngine> {
    state: GameState,
    engine: Arc<E>,
    pending: Option<PendingSearch>,
    last_search: Option<SearchReport>,
}

impl Game<StandardEngine> {
    pub fn new(config: GameConfig) -> Self {
        Game::with_engine(StandardEngine, GameState::new(config))
    }
}

impl<E> Game<E>
where
    E: AlphaBetaSearch + Send + Sync + 'static,
{
    /// Starts a session. If the automated opponent is to move, it starts
    /// thinking right away.
    pub fn with_engine(engine: E, state: GameState) -> Self {
        let mut game = Game {
            state,
            engine: Arc::new(engine),
            pending: None,
            last_search: None,
        };
        game.maybe_start_search();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn search_in_progress(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_search(&self) -> Option<&SearchReport> {
        self.last_search.as_ref()
    }

    // -------------------------------------
    // Commands
    // ------------------------------------

    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        if self.search_in_progress() {
            debug!("Ignoring click on {} while searching", pos);
            return ClickOutcome::Busy;
        }
        let outcome = self.state.click(pos);
        if let ClickOutcome::Moved(_) = outcome {
            self.maybe_start_search();
        }
        outcome
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Takes back one move, or two when that leaves the automated opponent to
    /// move, so a human move and the reply to it go together. Returns the
    /// number of moves taken back.
    pub fn undo(&mut self) -> usize {
        if self.search_in_progress() {
            debug!("Ignoring undo while searching");
            return 0;
        }
        let mut undone = 0;
        if self.state.undo().is_some() {
            undone += 1;
            if self.state.automated_opponent_enabled()
                && self.state.get_current_player() == self.state.opponent()
                && self.state.undo().is_some()
            {
                undone += 1;
            }
        }
        self.maybe_start_search();
        undone
    }

    pub fn toggle_automated_opponent(&mut self) -> bool {
        let enabled = self.state.toggle_automated_opponent();
        self.maybe_start_search();
        enabled
    }

    pub fn increase_depth(&mut self) -> u8 {
        self.state.increase_depth()
    }

    pub fn decrease_depth(&mut self) -> u8 {
        self.state.decrease_depth()
    }

    // -------------------------------------
    // Background search
    // ------------------------------------

    /// Collects a finished search without blocking and plays its move.
    pub fn poll(&mut self) -> Option<SearchReport> {
        let received = self.pending.as_ref()?.rx.try_recv();
        match received {
            Ok(report) => Some(self.finish_search(report)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.abandon_search();
                None
            }
        }
    }

    /// Blocks until the running search is done and plays its move.
    /// Returns None right away if nothing is running.
    pub fn wait_for_search(&mut self) -> Option<SearchReport> {
        let received = self.pending.as_ref()?.rx.recv();
        match received {
            Ok(report) => Some(self.finish_search(report)),
            Err(_) => {
                self.abandon_search();
                None
            }
        }
    }

    fn maybe_start_search(&mut self) -> bool {
        if self.pending.is_some() || !self.state.opponent_to_move() {
            return false;
        }

        let mut board = self.state.board().clone();
        let color = self.state.opponent();
        let depth = self.state.search_depth();
        let engine = Arc::clone(&self.engine);
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                let start = Instant::now();
                let result = engine.search(&mut board, color, depth);
                // The receiver is gone only if the game was dropped
                let _ = tx.send(SearchReport {
                    result,
                    color,
                    depth,
                    elapsed: start.elapsed(),
                    applied: false,
                });
            });

        match spawned {
            Ok(join) => {
                info!("Searching for {} at depth {}", color, depth);
                self.pending = Some(PendingSearch {
                    rx,
                    join: Some(join),
                    ply: self.state.history().len(),
                });
                true
            }
            Err(e) => {
                error!("Could not start the search thread: {}", e);
                false
            }
        }
    }

    fn finish_search(&mut self, mut report: SearchReport) -> SearchReport {
        let ply = match self.pending.take() {
            Some(mut pending) => {
                if let Some(join) = pending.join.take() {
                    // The result is already sent, the thread is on its way out
                    let _ = join.join();
                }
                pending.ply
            }
            None => self.state.history().len(),
        };

        info!(
            "Search for {} done in {:.2?}: depth {}, score {}, {} nodes",
            report.color, report.elapsed, report.depth, report.result.score, report.result.nodes
        );
        report.applied = self.apply_search_result(&report, ply);
        self.last_search = Some(report);
        report
    }

    fn apply_search_result(&mut self, report: &SearchReport, ply: usize) -> bool {
        let mv = match report.result.best_move {
            Some(mv) => mv,
            None => {
                warn!("{} has no legal move, leaving the board as it is", report.color);
                return false;
            }
        };
        if self.state.is_over() {
            warn!("Game already over, discarding {}", mv);
            return false;
        }
        if self.state.history().len() != ply || self.state.get_current_player() != report.color {
            warn!("Position changed during the search, discarding {}", mv);
            return false;
        }
        if !legal_moves(self.state.board(), mv.start).contains(&mv.end) {
            error!("Search returned illegal move {}", mv);
            return false;
        }

        match self.state.apply_move(mv, true) {
            Ok(_) => true,
            Err(e) => {
                error!("Could not play {}: {}", mv, e);
                false
            }
        }
    }

    fn abandon_search(&mut self) {
        let crashed = self
            .pending
            .take()
            .and_then(|mut pending| pending.join.take())
            .and_then(|join| join.join().err());
        match crashed {
            Some(payload) => error!(
                "Search thread ended without a result: {}",
                panic_message(payload.as_ref())
            ),
            None => error!("Search thread ended without a result"),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
