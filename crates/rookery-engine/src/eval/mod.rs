//! Tapered handcrafted evaluation.

pub mod params;
pub mod pawns;
pub mod phase;
pub mod pst;
pub mod rooks;
pub mod score;

use rookery_core::{ALL_PIECES, Color, Piece, Position};

use params::EvalParams;
use pawns::evaluate_pawns_for_side;
use phase::game_phase;
use pst::pst_value;
use rooks::evaluate_rooks_for_side;
use score::{Score, taper};

/// Bound on any static evaluation, kept clear of the mate range.
pub const MAX_EVAL: i32 = 20_000;

/// Static evaluation oracle.
///
/// Owns its weights, so several evaluators with different parameter sets can
/// coexist.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    params: EvalParams,
}

impl Evaluator {
    pub fn new(params: EvalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut EvalParams {
        &mut self.params
    }

    /// Score `pos` in centipawns from the side to move's perspective.
    ///
    /// The result always lies within `-MAX_EVAL..=MAX_EVAL`.
    pub fn evaluate(&self, pos: &Position) -> i32 {
        let (white_mg, white_eg) = self.side_totals(pos, Color::White);
        let (black_mg, black_eg) = self.side_totals(pos, Color::Black);
        let eval = taper(white_mg - black_mg, white_eg - black_eg, game_phase(pos))
            .clamp(-MAX_EVAL, MAX_EVAL);
        match pos.side_to_move() {
            Color::White => eval,
            Color::Black => -eval,
        }
    }

    /// Material, placement and structure terms for one side as unpacked
    /// `(mg, eg)` totals.
    fn side_totals(&self, pos: &Position, color: Color) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;
        let mut add = |score: Score, count: i32| {
            mg += score.mg() as i32 * count;
            eg += score.eg() as i32 * count;
        };
        for piece in ALL_PIECES {
            let bb = pos.pieces(piece, color);
            add(self.params.material[piece.to_index()], bb.popcnt() as i32);
            for sq in bb {
                add(pst_value(piece, color, sq), 1);
            }
        }
        add(evaluate_pawns_for_side(pos, color, &self.params), 1);
        add(evaluate_rooks_for_side(pos, color, &self.params), 1);
        (mg, eg)
    }

    /// Middlegame value of `piece`, shared with move ordering.
    pub fn piece_value(&self, piece: Piece) -> i32 {
        self.params.piece_value_mg(piece)
    }
}
