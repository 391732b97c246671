//! Rook on the seventh rank.

use rookery_core::{Color, Piece, Position, Rank, get_rank};

use crate::eval::params::EvalParams;
use crate::eval::score::Score;

/// Seventh-rank bonus for one side's rooks, from that side's point of view.
pub fn evaluate_rooks_for_side(pos: &Position, color: Color, params: &EvalParams) -> Score {
    let seventh = match color {
        Color::White => get_rank(Rank::Seventh),
        Color::Black => get_rank(Rank::Second),
    };
    let count = (pos.pieces(Piece::Rook, color) & seventh).popcnt() as i16;
    params.rook_seventh * count
}
