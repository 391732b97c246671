//! Piece-square tables for all six piece types.
//!
//! Each table stores one half-board (files A-D) from White's point of view,
//! rank-major: index `rank * 4 + file`. Files E-H mirror D-A, and Black
//! squares are flipped vertically before lookup. Use [`pst_value`].

use rookery_core::{Color, Piece, Square};

use crate::eval::score::{S, Score};

#[rustfmt::skip]
const PAWN: [Score; 32] = [
    S(  0,   0), S(  0,   0), S(  0,   0), S(  0,   0),
    S(  0,   0), S(  0,   0), S(  0,   0), S(  0,   0),
    S(  0,   5), S(  0,   5), S(  0,   5), S( 10,   5),
    S(  0,  10), S(  0,  10), S(  0,  10), S( 20,  10),
    S(  0,  30), S(  0,  30), S(  0,  30), S( 15,  30),
    S(  0,  50), S(  0,  50), S(  0,  50), S(  0,  50),
    S(  0,  80), S(  0,  80), S(  0,  80), S(  0,  80),
    S(  0,   0), S(  0,   0), S(  0,   0), S(  0,   0),
];

#[rustfmt::skip]
const KNIGHT: [Score; 32] = [
    S(-50, -30), S(-30, -20), S(-20, -10), S(-15,   0),
    S(-30, -20), S( -5, -10), S(  0,  -5), S(  5,   5),
    S(-10, -10), S(  0,  -5), S(  5,   5), S( 10,  10),
    S(-10,   0), S(  5,   0), S( 10,  15), S( 20,  20),
    S(-10,   0), S(  5,   0), S( 10,  15), S( 20,  20),
    S(-10, -10), S(  0,  -5), S(  5,   5), S( 10,  10),
    S(-30, -20), S( -5, -10), S(  0,  -5), S(  5,   5),
    S(-50, -30), S(-30, -20), S(-20, -10), S(-15,   0),
];

#[rustfmt::skip]
const BISHOP: [Score; 32] = [
    S(-20, -20), S(-20, -15), S(-20, -10), S(-20, -10),
    S(-10,   0), S(  0,   0), S( -5,   0), S(  0,   0),
    S( -5,   0), S(  5,   0), S(  5,   0), S(  5,   0),
    S(  0,   0), S(  5,   0), S( 10,   0), S( 15,   0),
    S(  0,   0), S(  5,   0), S( 10,   0), S( 15,   0),
    S( -5,   0), S(  5,   0), S(  5,   0), S(  5,   0),
    S(-10,   0), S(  0,   0), S( -5,   0), S(  0,   0),
    S(-20, -20), S(-20, -15), S(-20, -10), S(-20, -10),
];

#[rustfmt::skip]
const ROOK: [Score; 32] = [
    S( -5,  -5), S(  0,  -3), S(  2,  -1), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,   0), S(  0,   0), S(  2,   0), S(  5,   0),
    S( -5,  -5), S(  0,  -3), S(  2,  -1), S(  5,   0),
];

#[rustfmt::skip]
const QUEEN: [Score; 32] = [
    S(-10, -20), S( -5, -10), S( -5,  -5), S( -5,   0),
    S( -5, -10), S(  0,  -5), S(  0,   0), S(  0,   5),
    S( -5,  -5), S(  0,   5), S(  0,   5), S(  0,  10),
    S( -5,   0), S(  0,   5), S(  0,  10), S(  0,  15),
    S( -5,   0), S(  0,   5), S(  0,  10), S(  0,  15),
    S( -5,  -5), S(  0,   5), S(  0,   5), S(  0,  10),
    S( -5, -10), S(  0,  -5), S(  0,   0), S(  0,   5),
    S(-10, -20), S( -5, -10), S( -5,  -5), S( -5,   0),
];

#[rustfmt::skip]
const KING: [Score; 32] = [
    S( 30, -70), S( 45, -45), S( 10, -35), S(-10, -20),
    S( 10, -40), S( 20, -25), S(  0, -10), S(-15,   5),
    S(-20, -30), S(-25, -15), S(-30,   5), S(-30,  10),
    S(-40, -20), S(-50,   5), S(-60,  10), S(-70,  20),
    S(-70, -20), S(-80,   5), S(-90,  10), S(-90,  20),
    S(-70, -30), S(-80, -15), S(-90,   5), S(-90,  10),
    S(-80, -40), S(-80, -25), S(-90, -10), S(-90,   0),
    S(-90, -70), S(-90, -45), S(-90, -15), S(-90, -20),
];

const TABLES: [&[Score; 32]; 6] = [&PAWN, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING];

/// Look up the piece-square bonus for `piece` of `color` on `sq`.
pub fn pst_value(piece: Piece, color: Color, sq: Square) -> Score {
    let idx = match color {
        Color::White => sq.to_index(),
        Color::Black => sq.to_index() ^ 56,
    };
    let rank = idx / 8;
    let file = idx % 8;
    let half_file = if file < 4 { file } else { 7 - file };
    TABLES[piece.to_index()][rank * 4 + half_file]
}
