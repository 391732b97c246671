//! Session-wide search state: node counter, stop flag and clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rookery_core::Color;

use crate::time::{SearchLimits, time_budget};

/// The clock is read once every this many nodes.
const CLOCK_CHECK_INTERVAL: u64 = 4096;

/// Counters and cancellation shared by every node of one search session.
///
/// The stop flag is an `Arc` so a controller thread (the UCI loop) can hold a
/// clone and abort the search at any time. The search polls it at every node
/// and sets it itself when the time budget or node limit runs out.
///
/// An externally supplied flag belongs to its owner: sessions never clear it,
/// so a stop raised before the search starts still ends it. Owners hand each
/// session a fresh flag.
#[derive(Debug)]
pub struct SearchGlobals {
    nodes: AtomicU64,
    stop: Arc<AtomicBool>,
    owns_stop: bool,
    start: Instant,
    side_to_move: Color,
    limits: SearchLimits,
    budget: Option<Duration>,
}

impl SearchGlobals {
    /// Create globals with a private stop flag.
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            owns_stop: true,
            ..Self::with_stop_flag(limits, Arc::new(AtomicBool::new(false)))
        }
    }

    /// Create globals around an externally owned stop flag.
    pub fn with_stop_flag(limits: SearchLimits, stop: Arc<AtomicBool>) -> Self {
        Self {
            nodes: AtomicU64::new(0),
            stop,
            owns_stop: false,
            start: Instant::now(),
            side_to_move: Color::White,
            budget: time_budget(&limits, Color::White),
            limits,
        }
    }

    /// Reset counters and start the clock for a new session.
    ///
    /// Clears the stop flag only when it is private.
    pub fn begin_session(&mut self, side_to_move: Color) {
        self.nodes.store(0, Ordering::Relaxed);
        if self.owns_stop {
            self.stop.store(false, Ordering::Relaxed);
        }
        self.start = Instant::now();
        self.side_to_move = side_to_move;
        self.budget = time_budget(&self.limits, side_to_move);
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Time this session may use, if bounded.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Count one node and return the new total.
    pub fn increment_nodes(&self) -> u64 {
        self.nodes.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Request the session to end.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Return `true` once the stop flag is set, without consulting the clock.
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Decide whether the search must abort now.
    ///
    /// The stop flag is read on every call; the node limit is compared on
    /// every call; the clock is read only when the node count is a multiple
    /// of 4096. Hitting a limit sets the stop flag so later calls return early.
    pub fn should_stop(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        let nodes = self.nodes();
        if let Some(limit) = self.limits.nodes
            && nodes >= limit
        {
            self.stop();
            return true;
        }

        if nodes % CLOCK_CHECK_INTERVAL != 0 {
            return false;
        }

        if self.out_of_time() {
            self.stop();
            return true;
        }

        false
    }

    /// Return `true` if the time budget is spent. Reads the clock every call.
    pub fn out_of_time(&self) -> bool {
        self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }
}
