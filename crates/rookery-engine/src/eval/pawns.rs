//! Pawn structure terms: doubled and isolated pawns.

use rookery_core::{Color, Piece, Position, get_adjacent_files};

use crate::eval::params::EvalParams;
use crate::eval::score::Score;

/// Pawn structure score for one side, from that side's point of view.
///
/// A pawn counts as doubled when a friendly pawn stands on a higher rank of
/// the same file, so each extra pawn on a file is charged once.
pub fn evaluate_pawns_for_side(pos: &Position, color: Color, params: &EvalParams) -> Score {
    let pawns = pos.pieces(Piece::Pawn, color);
    let mut score = Score::ZERO;

    for sq in pawns {
        let file = sq.get_file();
        let rank = sq.get_rank().to_index();

        let doubled = pawns
            .into_iter()
            .any(|other| other.get_file() == file && other.get_rank().to_index() > rank);
        if doubled {
            score += params.doubled_pawn;
        }

        if (pawns & get_adjacent_files(file)).popcnt() == 0 {
            score += params.isolated_pawn;
        }
    }

    score
}
