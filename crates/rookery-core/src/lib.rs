//! Core chess types: moves, move lists and a make/unmake position.
//!
//! Legal move generation and Zobrist hashing come from the `chess` crate;
//! this crate adds in-place make/unmake, the halfmove clock, repetition
//! detection and move classification on top of it.

mod chess_move;
mod error;
mod move_list;
mod position;

pub use chess::{
    ALL_PIECES, ALL_SQUARES, BitBoard, Color, File, Piece, Rank, Square, get_adjacent_files, get_file,
    get_rank,
};
pub use chess_move::{Move, MoveKind, PromotionPiece};
pub use error::PositionError;
pub use move_list::{MAX_MOVES, MoveList};
pub use position::{Position, STARTING_FEN};
