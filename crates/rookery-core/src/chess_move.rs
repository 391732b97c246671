//! Chess move representation, bit-packed into a u16.

use std::fmt;

use chess::{ALL_SQUARES, ChessMove, Piece, Square};

const SRC_MASK: u16 = 0x003F;
const DST_MASK: u16 = 0x0FC0;
const PROMO_MASK: u16 = 0x3000;
const KIND_MASK: u16 = 0xC000;
const DST_SHIFT: u32 = 6;
const PROMO_SHIFT: u32 = 12;
const KIND_SHIFT: u32 = 14;

/// The category of a chess move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

impl MoveKind {
    const fn bits(self) -> u16 {
        (self as u16) << KIND_SHIFT
    }
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl PromotionPiece {
    /// Convert to the corresponding [`Piece`].
    pub const fn to_piece(self) -> Piece {
        match self {
            PromotionPiece::Knight => Piece::Knight,
            PromotionPiece::Bishop => Piece::Bishop,
            PromotionPiece::Rook => Piece::Rook,
            PromotionPiece::Queen => Piece::Queen,
        }
    }

    /// Map a promotion target back from a [`Piece`]. Pawns and kings have none.
    pub const fn from_piece(piece: Piece) -> Option<PromotionPiece> {
        match piece {
            Piece::Knight => Some(PromotionPiece::Knight),
            Piece::Bishop => Some(PromotionPiece::Bishop),
            Piece::Rook => Some(PromotionPiece::Rook),
            Piece::Queen => Some(PromotionPiece::Queen),
            Piece::Pawn | Piece::King => None,
        }
    }

    /// Return the UCI character for this promotion.
    pub const fn uci_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }

    const fn bits(self) -> u16 {
        (self as u16) << PROMO_SHIFT
    }
}

/// A chess move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  source square      (0-63)
/// bits  6-11: destination square (0-63)
/// bits 12-13: promotion piece    (Knight=0, Bishop=1, Rook=2, Queen=3)
/// bits 14-15: move kind          (Normal=0, Promotion=1, EnPassant=2, Castling=3)
/// ```
///
/// The kind tag is filled in by [`Position`](crate::Position) when it
/// classifies generated moves, so two moves compare equal only when both
/// squares, the kind and the promotion piece agree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Create a normal (quiet or capture) move.
    pub fn new(source: Square, dest: Square) -> Move {
        Move(pack_squares(source, dest))
    }

    /// Create a promotion move.
    pub fn new_promotion(source: Square, dest: Square, promo: PromotionPiece) -> Move {
        Move(pack_squares(source, dest) | promo.bits() | MoveKind::Promotion.bits())
    }

    /// Create an en passant capture.
    pub fn new_en_passant(source: Square, dest: Square) -> Move {
        Move(pack_squares(source, dest) | MoveKind::EnPassant.bits())
    }

    /// Create a castling move from the king's source and destination squares.
    pub fn new_castle(king_src: Square, king_dst: Square) -> Move {
        Move(pack_squares(king_src, king_dst) | MoveKind::Castling.bits())
    }

    /// Raw 16-bit encoding, used by the transposition table.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Rebuild a move from its raw encoding.
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    /// Extract the source square.
    pub fn source(self) -> Square {
        ALL_SQUARES[(self.0 & SRC_MASK) as usize]
    }

    /// Extract the destination square.
    pub fn dest(self) -> Square {
        ALL_SQUARES[((self.0 & DST_MASK) >> DST_SHIFT) as usize]
    }

    /// Extract the move kind.
    pub const fn kind(self) -> MoveKind {
        match (self.0 & KIND_MASK) >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// Extract the promotion piece, if this is a promotion.
    pub const fn promotion(self) -> Option<PromotionPiece> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self.0 & PROMO_MASK) >> PROMO_SHIFT {
            0 => PromotionPiece::Knight,
            1 => PromotionPiece::Bishop,
            2 => PromotionPiece::Rook,
            _ => PromotionPiece::Queen,
        })
    }

    pub const fn is_promotion(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::Promotion as u16
    }

    pub const fn is_en_passant(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::EnPassant as u16
    }

    pub const fn is_castle(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::Castling as u16
    }

    /// Convert to the rules engine's move type.
    pub fn to_chess_move(self) -> ChessMove {
        ChessMove::new(
            self.source(),
            self.dest(),
            self.promotion().map(PromotionPiece::to_piece),
        )
    }

    /// Return the UCI string representation.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

fn pack_squares(source: Square, dest: Square) -> u16 {
    (source.to_index() as u16) | ((dest.to_index() as u16) << DST_SHIFT)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.promotion() {
            Some(promo) => write!(f, "{}{}{}", self.source(), self.dest(), promo.uci_char()),
            None => write!(f, "{}{}", self.source(), self.dest()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} kind={:?})", self, self.kind())
    }
}

#[cfg(test)]
mod tests {
    use chess::Square;

    use super::{Move, MoveKind, PromotionPiece};

    #[test]
    fn size_of_move() {
        assert_eq!(std::mem::size_of::<Move>(), 2);
    }

    #[test]
    fn squares_survive_packing() {
        let mv = Move::new(Square::G1, Square::F3);
        assert_eq!(mv.source(), Square::G1);
        assert_eq!(mv.dest(), Square::F3);
        assert_eq!(mv.kind(), MoveKind::Normal);
        assert_eq!(mv.promotion(), None);
    }

    #[test]
    fn promotion_display_has_suffix() {
        let mv = Move::new_promotion(Square::A7, Square::A8, PromotionPiece::Knight);
        assert_eq!(mv.to_string(), "a7a8n");
        assert_eq!(mv.promotion(), Some(PromotionPiece::Knight));
    }

    #[test]
    fn kind_distinguishes_equal_squares() {
        let normal = Move::new(Square::E5, Square::D6);
        let ep = Move::new_en_passant(Square::E5, Square::D6);
        assert_ne!(normal, ep);
        assert!(ep.is_en_passant());
        assert_eq!(normal.to_string(), ep.to_string());
    }

    #[test]
    fn raw_encoding_is_stable() {
        let mv = Move::new_castle(Square::E1, Square::G1);
        assert_eq!(Move::from_raw(mv.raw()), mv);
        assert!(mv.is_castle());
    }

    #[test]
    fn converts_to_chess_move() {
        let mv = Move::new_promotion(Square::B7, Square::C8, PromotionPiece::Queen);
        let cm = mv.to_chess_move();
        assert_eq!(cm.get_source(), Square::B7);
        assert_eq!(cm.get_dest(), Square::C8);
        assert_eq!(cm.get_promotion(), Some(chess::Piece::Queen));
    }
}
