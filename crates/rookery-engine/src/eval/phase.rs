//! Game phase calculation based on remaining material.

use rookery_core::{ALL_PIECES, Color, Piece, Position};

/// Phase of the full starting material.
///
/// Weights: Pawn=1, Knight=10, Bishop=10, Rook=20, Queen=40.
/// Starting totals: 16×1 + 4×10 + 4×10 + 4×20 + 2×40 = 256.
pub const MAX_PHASE: i32 = 256;

/// Phase weight indexed by [`Piece::to_index`].
const PIECE_PHASE: [i32; 6] = [1, 10, 10, 20, 40, 0];

/// Calculate the game phase in `0..=MAX_PHASE`.
///
/// Promoted pieces can push the raw sum past [`MAX_PHASE`]; the result is
/// clamped.
pub fn game_phase(pos: &Position) -> i32 {
    let mut phase = 0;
    for piece in ALL_PIECES {
        let count = pos.pieces(piece, Color::White).popcnt() + pos.pieces(piece, Color::Black).popcnt();
        phase += count as i32 * piece_phase(piece);
    }
    phase.min(MAX_PHASE)
}

/// Phase weight of a single piece.
pub const fn piece_phase(piece: Piece) -> i32 {
    PIECE_PHASE[piece as usize]
}
