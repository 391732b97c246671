//! Search algorithms and move ordering.

pub mod control;
pub mod negamax;
pub mod ordering;
pub mod quiescence;
pub mod stack;
pub mod tt;

use std::fmt;
use std::time::Duration;

use rookery_core::{Move, Position};
use tracing::debug;

use crate::eval::Evaluator;
use control::SearchGlobals;
use negamax::{INFINITE, MATE_SCORE, MAX_MATE_SCORE, MAX_PLY, SearchContext, SearchResult, negamax};
use quiescence::quiescence;
use stack::SearchStack;
use tt::TranspositionTable;

/// Default transposition table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 16;

/// Score as reported to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreReport {
    /// Mate in this many moves; negative when the side to move is mated.
    Mate(i32),
    Centipawns(i32),
}

impl ScoreReport {
    /// Convert an internal search score.
    pub fn from_score(score: i32) -> Self {
        if score <= -MAX_MATE_SCORE {
            ScoreReport::Mate((-score - MATE_SCORE) / 2)
        } else if score >= MAX_MATE_SCORE {
            ScoreReport::Mate((-score + MATE_SCORE + 1) / 2)
        } else {
            ScoreReport::Centipawns(score)
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreReport::Mate(moves) => write!(f, "mate {moves}"),
            ScoreReport::Centipawns(cp) => write!(f, "cp {cp}"),
        }
    }
}

/// Progress report for one completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u8,
    pub score: ScoreReport,
    pub elapsed: Duration,
    pub nodes: u64,
    pub nps: u64,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    fn new(depth: u8, score: i32, elapsed: Duration, nodes: u64, pv: Vec<Move>) -> Self {
        let ms = elapsed.as_millis() as u64;
        let nps = if ms == 0 { nodes } else { nodes * 1000 / ms };
        Self {
            depth,
            score: ScoreReport::from_score(score),
            elapsed,
            nodes,
            nps,
            pv,
        }
    }
}

/// Iterative-deepening searcher.
///
/// Owns the transposition table, which persists across searches until
/// cleared or resized, and the evaluator.
pub struct Searcher {
    tt: TranspositionTable,
    evaluator: Evaluator,
}

impl Searcher {
    /// Create a searcher with a [`DEFAULT_HASH_MB`] table and default weights.
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::default())
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            tt: TranspositionTable::new(DEFAULT_HASH_MB),
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    /// Clear the transposition table (preserving the allocation).
    pub fn clear_tt(&self) {
        self.tt.clear();
    }

    /// Replace the transposition table with one of `mb` megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    /// Run iterative deepening and return the best move of the deepest
    /// completed iteration.
    ///
    /// Resets `globals` for a new session, then searches depth 1, 2, ... up
    /// to the depth limit (or [`MAX_PLY`]). `on_info` is called once per
    /// completed depth. An iteration interrupted by the stop flag is thrown
    /// away; if that happens during depth 1 there is no move to return.
    pub fn best_move_search<F>(
        &self,
        pos: &mut Position,
        globals: &mut SearchGlobals,
        mut on_info: F,
    ) -> Option<Move>
    where
        F: FnMut(&SearchInfo),
    {
        globals.begin_session(pos.side_to_move());
        self.tt.new_generation();
        let globals = &*globals;
        debug!(
            side = ?globals.side_to_move(),
            budget_ms = globals.budget().map(|b| b.as_millis() as u64),
            "search session started"
        );

        let max_depth = globals
            .limits()
            .depth
            .map_or(MAX_PLY, |d| (d as usize).clamp(1, MAX_PLY));

        let mut stack = SearchStack::new();
        let mut best_move = None;

        for depth in 1..=max_depth {
            let mut ctx = SearchContext {
                tt: &self.tt,
                evaluator: &self.evaluator,
                globals,
                stack: &mut stack,
            };
            let result = negamax(pos, -INFINITE, INFINITE, depth as i32, 0, &mut ctx);

            if depth > 1 && globals.is_stopped() {
                return best_move;
            }

            let Some(pv) = result.pv else {
                break;
            };
            best_move = pv.first().copied();

            let info = SearchInfo::new(
                depth as u8,
                result.score,
                globals.elapsed(),
                globals.nodes(),
                pv,
            );
            debug!(
                depth = info.depth,
                score = %info.score,
                nodes = info.nodes,
                elapsed_ms = info.elapsed.as_millis() as u64,
                "iteration complete"
            );
            on_info(&info);

            if globals.out_of_time() {
                break;
            }
        }

        best_move
    }

    /// Full-window fixed-depth search with fresh session state.
    pub fn search(&self, pos: &mut Position, depth: i32) -> SearchResult {
        self.search_window(pos, -INFINITE, INFINITE, depth)
    }

    /// Fixed-depth search of the window `(alpha, beta)` with fresh session
    /// state.
    pub fn search_window(&self, pos: &mut Position, alpha: i32, beta: i32, depth: i32) -> SearchResult {
        let mut globals = SearchGlobals::new(Default::default());
        globals.begin_session(pos.side_to_move());
        let mut stack = SearchStack::new();
        let mut ctx = SearchContext {
            tt: &self.tt,
            evaluator: &self.evaluator,
            globals: &globals,
            stack: &mut stack,
        };
        negamax(pos, alpha, beta, depth, 0, &mut ctx)
    }

    /// Full-window quiescence search of `pos`.
    pub fn qsearch(&self, pos: &mut Position) -> i32 {
        let mut globals = SearchGlobals::new(Default::default());
        globals.begin_session(pos.side_to_move());
        let mut stack = SearchStack::new();
        let mut ctx = SearchContext {
            tt: &self.tt,
            evaluator: &self.evaluator,
            globals: &globals,
            stack: &mut stack,
        };
        quiescence(pos, -INFINITE, INFINITE, 0, &mut ctx)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
