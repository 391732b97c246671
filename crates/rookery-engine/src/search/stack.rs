//! Per-ply search stack holding killer moves.

use rookery_core::Move;

use crate::search::negamax::MAX_PLY;

/// One ply's worth of search state.
#[derive(Debug, Clone, Copy)]
pub struct StackEntry {
    /// Quiet moves that caused a beta cutoff at this ply, most recent first.
    pub killers: [Option<Move>; 2],
    /// Ply index of this slot.
    pub ply: usize,
}

/// Bounded stack indexed by ply.
///
/// Created once per search session and shared by every iteration of that
/// session, so killers found at depth `d` help order depth `d + 1`.
pub struct SearchStack {
    entries: Box<[StackEntry; MAX_PLY]>,
}

impl SearchStack {
    pub fn new() -> Self {
        let mut entries = Box::new(
            [StackEntry {
                killers: [None; 2],
                ply: 0,
            }; MAX_PLY],
        );
        for (ply, entry) in entries.iter_mut().enumerate() {
            entry.ply = ply;
        }
        Self { entries }
    }

    /// Killer moves at `ply`, most recent first.
    pub fn killers(&self, ply: usize) -> [Option<Move>; 2] {
        self.entries
            .get(ply)
            .map_or([None; 2], |entry| entry.killers)
    }

    /// Record a quiet cutoff move at `ply`.
    ///
    /// A move already in slot 0 is left alone; otherwise slot 0 shifts to
    /// slot 1 and `mv` takes slot 0.
    pub fn store_killer(&mut self, ply: usize, mv: Move) {
        let Some(entry) = self.entries.get_mut(ply) else {
            return;
        };
        if entry.killers[0] != Some(mv) {
            entry.killers[1] = entry.killers[0];
            entry.killers[0] = Some(mv);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.killers(ply).contains(&Some(mv))
    }

    #[cfg(test)]
    pub(crate) fn entry(&self, ply: usize) -> Option<&StackEntry> {
        self.entries.get(ply)
    }
}

impl Default for SearchStack {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SearchStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = self
            .entries
            .iter()
            .filter(|e| e.killers[0].is_some())
            .count();
        f.debug_struct("SearchStack")
            .field("plies_with_killers", &filled)
            .finish()
    }
}
