//! Tunable evaluation weights.
//!
//! Every weight can be read and written by name so that an outer layer
//! (the UCI `setoption` handler, or an offline tuner) can adjust them without
//! touching global state. The default values are the tuned set.

use rookery_core::Piece;

use crate::eval::score::{S, Score};

/// Errors from parameter access by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// No parameter with this name exists.
    #[error("unknown evaluation parameter \"{0}\"")]
    UnknownParameter(String),
    /// The value does not fit in a packed score half.
    #[error("value {value} for \"{name}\" is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// Lowest accepted parameter value.
///
/// Eight pawns charged both structure penalties at this weight still fit one
/// packed score half.
pub const PARAM_MIN: i32 = -2000;
/// Highest accepted parameter value.
pub const PARAM_MAX: i32 = 2000;

/// Parameter names in declaration order, middlegame before endgame.
pub const PARAM_NAMES: [&str; 16] = [
    "PawnMG",
    "PawnEG",
    "KnightMG",
    "KnightEG",
    "BishopMG",
    "BishopEG",
    "RookMG",
    "RookEG",
    "QueenMG",
    "QueenEG",
    "Rook7thRankMG",
    "Rook7thRankEG",
    "DoubledPawnMG",
    "DoubledPawnEG",
    "IsolatedPawnMG",
    "IsolatedPawnEG",
];

/// Evaluation weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalParams {
    /// Material value indexed by [`Piece::to_index`]; the king entry stays zero.
    pub material: [Score; 6],
    /// Rook on the seventh rank relative to its owner.
    pub rook_seventh: Score,
    /// Pawn with a friendly pawn further up the same file.
    pub doubled_pawn: Score,
    /// Pawn with no friendly pawn on either adjacent file.
    pub isolated_pawn: Score,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            material: [
                S(147, 116),
                S(378, 518),
                S(414, 547),
                S(741, 658),
                S(1335, 1474),
                S(0, 0),
            ],
            rook_seventh: S(101, -3),
            doubled_pawn: S(-13, -43),
            isolated_pawn: S(-31, -5),
        }
    }
}

impl EvalParams {
    /// Middlegame material value of `piece`, used by move ordering.
    pub fn piece_value_mg(&self, piece: Piece) -> i32 {
        self.material[piece.to_index()].mg() as i32
    }

    /// Read a parameter by name.
    pub fn get(&self, name: &str) -> Result<i32, EvalError> {
        let (score, midgame) = self.locate(name)?;
        let half = if midgame { score.mg() } else { score.eg() };
        Ok(half as i32)
    }

    /// Overwrite a parameter by name.
    pub fn set(&mut self, name: &str, value: i32) -> Result<(), EvalError> {
        if !(PARAM_MIN..=PARAM_MAX).contains(&value) {
            return Err(EvalError::OutOfRange {
                name: name.to_string(),
                value,
                min: PARAM_MIN,
                max: PARAM_MAX,
            });
        }
        let (score, midgame) = self.locate_mut(name)?;
        let value = value as i16;
        *score = if midgame {
            S(value, score.eg())
        } else {
            S(score.mg(), value)
        };
        Ok(())
    }

    /// Iterate over `(name, value)` pairs in [`PARAM_NAMES`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        PARAM_NAMES
            .iter()
            .filter_map(move |&name| self.get(name).ok().map(|v| (name, v)))
    }

    fn slot_of(name: &str) -> Result<(usize, bool), EvalError> {
        PARAM_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| (i / 2, i % 2 == 0))
            .ok_or_else(|| EvalError::UnknownParameter(name.to_string()))
    }

    fn locate(&self, name: &str) -> Result<(&Score, bool), EvalError> {
        let (slot, midgame) = Self::slot_of(name)?;
        let score = match slot {
            0..=4 => &self.material[slot],
            5 => &self.rook_seventh,
            6 => &self.doubled_pawn,
            _ => &self.isolated_pawn,
        };
        Ok((score, midgame))
    }

    fn locate_mut(&mut self, name: &str) -> Result<(&mut Score, bool), EvalError> {
        let (slot, midgame) = Self::slot_of(name)?;
        let score = match slot {
            0..=4 => &mut self.material[slot],
            5 => &mut self.rook_seventh,
            6 => &mut self.doubled_pawn,
            _ => &mut self.isolated_pawn,
        };
        Ok((score, midgame))
    }
}
