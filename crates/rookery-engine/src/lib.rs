//! Search and evaluation for rookery.

pub mod eval;
pub mod search;
pub mod time;

pub use eval::params::{EvalError, EvalParams};
pub use eval::Evaluator;
pub use search::control::SearchGlobals;
pub use search::negamax::{INFINITE, MATE_SCORE, MAX_MATE_SCORE, MAX_PLY, SearchResult};
pub use search::tt::{Bound, TranspositionTable, TtEntry};
pub use search::{DEFAULT_HASH_MB, ScoreReport, SearchInfo, Searcher};
pub use time::{SearchLimits, time_budget};
