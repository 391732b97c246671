//! Time control input and per-move budget.

use std::time::Duration;

use rookery_core::Color;

/// Moves assumed to remain when the clock does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Safety margin taken off the budget when the next time control is one move
/// away.
pub const LAST_MOVE_OVERHEAD: Duration = Duration::from_millis(50);

/// Limits for one search session, as supplied by the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
    pub white_increment: Option<Duration>,
    pub black_increment: Option<Duration>,
    pub moves_to_go: Option<u32>,
    pub move_time: Option<Duration>,
    pub infinite: bool,
    /// Deepest iteration to run.
    pub depth: Option<u8>,
    /// Abort once this many nodes have been searched.
    pub nodes: Option<u64>,
}

impl SearchLimits {
    /// Limits for a fixed-depth search with no clock.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Limits for a fixed-time search.
    pub fn move_time(move_time: Duration) -> Self {
        Self {
            move_time: Some(move_time),
            ..Self::default()
        }
    }
}

/// Time the side to move may spend on this search, or `None` when only an
/// external stop (or a depth/node limit) ends it.
///
/// With a running clock the budget is
/// `(remaining + (moves_to_go - 1) * increment) / moves_to_go` in whole
/// milliseconds, minus [`LAST_MOVE_OVERHEAD`] when `moves_to_go == 1`. A
/// missing increment counts as zero. Without a clock, a fixed move time is
/// used as-is.
pub fn time_budget(limits: &SearchLimits, side: Color) -> Option<Duration> {
    if limits.infinite {
        return None;
    }

    let (remaining, increment) = match side {
        Color::White => (limits.white_time, limits.white_increment),
        Color::Black => (limits.black_time, limits.black_increment),
    };

    if let Some(remaining) = remaining {
        let remaining_ms = remaining.as_millis() as u64;
        let increment_ms = increment.unwrap_or(Duration::ZERO).as_millis() as u64;
        let moves_to_go = limits.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1) as u64;
        let mut budget_ms = (remaining_ms + (moves_to_go - 1) * increment_ms) / moves_to_go;
        if moves_to_go == 1 {
            budget_ms = budget_ms.saturating_sub(LAST_MOVE_OVERHEAD.as_millis() as u64);
        }
        return Some(Duration::from_millis(budget_ms));
    }

    limits.move_time
}
