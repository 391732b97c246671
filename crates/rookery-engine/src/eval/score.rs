//! Packed middlegame/endgame score type used throughout evaluation.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::eval::phase::MAX_PHASE;

/// Packed middlegame/endgame evaluation score.
///
/// Middlegame in the upper 16 bits, endgame in the lower 16 bits:
/// `((mg as i32) << 16) + (eg as i32)`. The encoding is additive, so sums
/// and differences operate on the packed word directly; extracting `mg`
/// adds `0x8000` first to undo the borrow a negative `eg` leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);

    #[inline]
    pub const fn new(mg: i16, eg: i16) -> Score {
        Score(((mg as i32) << 16).wrapping_add(eg as i32))
    }

    #[inline]
    pub const fn mg(self) -> i16 {
        (self.0.wrapping_add(0x8000) >> 16) as i16
    }

    #[inline]
    pub const fn eg(self) -> i16 {
        self.0 as i16
    }

    /// Interpolate between the two halves by game phase.
    ///
    /// `phase == MAX_PHASE` yields the middlegame value, `0` the endgame value.
    pub fn taper(self, phase: i32) -> i32 {
        taper(self.mg() as i32, self.eg() as i32, phase)
    }
}

/// [`Score::taper`] on unpacked halves, for totals that outgrow an `i16`.
pub fn taper(mg: i32, eg: i32, phase: i32) -> i32 {
    let phase = phase.clamp(0, MAX_PHASE);
    (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE
}

/// Shorthand constructor for a packed [`Score`].
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i16, eg: i16) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score(self.0.wrapping_neg())
    }
}

impl Mul<i16> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i16) -> Score {
        Score::new(self.mg().wrapping_mul(rhs), self.eg().wrapping_mul(rhs))
    }
}
