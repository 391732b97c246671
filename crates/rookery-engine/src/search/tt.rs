//! Lockless transposition table.
//!
//! Each slot is two `AtomicU64` words: `word0 = key ^ data` and
//! `word1 = data`. A probe returns `key = word0 ^ word1` together with the
//! decoded data, and the caller compares that key with its own hash. A slot
//! written by another position, or half-written, simply fails that
//! comparison.
//!
//! ## Data layout
//!
//! ```text
//!   bits 47-32: score        (i16 as u16)
//!   bits 30-26: generation   (5 bits, wraps at 32)
//!   bits 25-24: bound        (2 bits)
//!   bits 23-16: depth        (8 bits)
//!   bits 15-0:  move         (16 bits, 0 = none)
//! ```

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use rookery_core::Move;

use crate::search::negamax::MAX_MATE_SCORE;

/// Bound type stored in a TT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// Empty slot.
    None = 0,
    /// The stored score is exact.
    Exact = 1,
    /// The stored score is a lower bound (the node failed high).
    Lower = 2,
    /// The stored score is an upper bound (the node failed low).
    Upper = 3,
}

impl Bound {
    const fn from_bits(bits: u64) -> Self {
        match bits & 0x03 {
            1 => Bound::Exact,
            2 => Bound::Lower,
            3 => Bound::Upper,
            _ => Bound::None,
        }
    }
}

/// Decoded contents of a slot. The key may belong to another position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub bound: Bound,
    pub depth: u8,
    /// Score as stored; see [`score_from_tt`].
    pub score: i32,
}

/// Convert a root-relative mate score into a node-relative one for storage.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MAX_MATE_SCORE {
        score + ply as i32
    } else if score <= -MAX_MATE_SCORE {
        score - ply as i32
    } else {
        score
    }
}

/// Reverse [`score_to_tt`] at the probing node's ply.
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MAX_MATE_SCORE {
        score - ply as i32
    } else if score <= -MAX_MATE_SCORE {
        score + ply as i32
    } else {
        score
    }
}

fn pack(mv: Option<Move>, bound: Bound, depth: u8, score: i32, generation: u8) -> u64 {
    let mv_bits = mv.map_or(0, |m| m.raw()) as u64;
    let score = score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    mv_bits
        | (depth as u64) << 16
        | (bound as u64) << 24
        | ((generation & 0x1F) as u64) << 26
        | ((score as u16) as u64) << 32
}

fn unpack(key: u64, data: u64) -> TtEntry {
    let raw_move = (data & 0xFFFF) as u16;
    TtEntry {
        key,
        best_move: (raw_move != 0).then(|| Move::from_raw(raw_move)),
        bound: Bound::from_bits(data >> 24),
        depth: ((data >> 16) & 0xFF) as u8,
        score: ((data >> 32) & 0xFFFF) as u16 as i16 as i32,
    }
}

fn generation_of(data: u64) -> u8 {
    ((data >> 26) & 0x1F) as u8
}

struct Slot {
    word0: AtomicU64,
    word1: AtomicU64,
}

impl Slot {
    const fn new() -> Self {
        Self {
            word0: AtomicU64::new(0),
            word1: AtomicU64::new(0),
        }
    }
}

/// Fixed-size hash table of search results, shared across searches.
///
/// All methods take `&self`.
pub struct TranspositionTable {
    slots: Box<[Slot]>,
    mask: u64,
    generation: AtomicU8,
}

impl TranspositionTable {
    /// Create a table of at most `mb` megabytes, rounded down to a power of
    /// two number of slots.
    pub fn new(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        let count = 1usize << (bytes / std::mem::size_of::<Slot>()).max(1).ilog2();

        Self {
            slots: (0..count).map(|_| Slot::new()).collect(),
            mask: (count - 1) as u64,
            generation: AtomicU8::new(0),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.word0.store(0, Ordering::Relaxed);
            slot.word1.store(0, Ordering::Relaxed);
        }
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Advance the generation counter. Called once per search session.
    pub fn new_generation(&self) {
        let current = self.generation.load(Ordering::Relaxed);
        self.generation
            .store(current.wrapping_add(1) & 0x1F, Ordering::Relaxed);
    }

    /// Read the slot for `hash`. Check `entry.key == hash` before trusting it.
    pub fn probe(&self, hash: u64) -> TtEntry {
        let slot = &self.slots[(hash & self.mask) as usize];
        let word0 = slot.word0.load(Ordering::Relaxed);
        let word1 = slot.word1.load(Ordering::Relaxed);
        unpack(word0 ^ word1, word1)
    }

    /// Store a result for `hash`.
    ///
    /// Replaces the slot if it is empty, from an older generation, searched
    /// no deeper than `depth`, or if the new bound is exact.
    pub fn write(&self, mv: Option<Move>, bound: Bound, depth: u8, score: i32, hash: u64) {
        let slot = &self.slots[(hash & self.mask) as usize];
        let generation = self.generation.load(Ordering::Relaxed);

        let existing = slot.word1.load(Ordering::Relaxed);
        let old = unpack(0, existing);
        let replace = old.bound == Bound::None
            || generation_of(existing) != generation
            || depth >= old.depth
            || bound == Bound::Exact;
        if !replace {
            return;
        }

        let data = pack(mv, bound, depth, score, generation);
        slot.word0.store(hash ^ data, Ordering::Relaxed);
        slot.word1.store(data, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}
