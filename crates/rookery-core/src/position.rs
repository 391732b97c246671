//! Mutable game position with make/unmake and draw bookkeeping.

use std::str::FromStr;

use chess::{BitBoard, Board, ChessMove, Color, MoveGen, Piece, Rank, Square, get_rank};
use tracing::trace;

use crate::chess_move::{Move, PromotionPiece};
use crate::error::PositionError;
use crate::move_list::MoveList;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// State needed to take back one move.
#[derive(Clone, Copy)]
struct Undo {
    board: Board,
    halfmove_clock: u32,
    mv: Move,
}

/// A chess position that is mutated in place and restored with
/// [`unmake_move`](Position::unmake_move).
///
/// Every board reached through [`make_move`](Position::make_move) is kept on
/// an undo stack, which doubles as the hash history for repetition checks.
#[derive(Clone)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    undo: Vec<Undo>,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Position {
        Position {
            board: Board::default(),
            halfmove_clock: 0,
            undo: Vec::new(),
        }
    }

    /// Parse a position from FEN.
    ///
    /// The halfmove clock and fullmove number may be omitted, in which case
    /// the clock starts at zero.
    pub fn from_fen(fen: &str) -> Result<Position, PositionError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(PositionError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let halfmove_clock = match fields.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| PositionError::InvalidMoveCounter {
                    field: "halfmove clock",
                    found: (*field).to_string(),
                })?,
            None => 0,
        };
        if let Some(field) = fields.get(5) {
            field
                .parse::<u32>()
                .map_err(|_| PositionError::InvalidMoveCounter {
                    field: "fullmove number",
                    found: (*field).to_string(),
                })?;
        }

        let board = Board::from_str(&fields[..4].join(" ")).map_err(|e| {
            PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Position {
            board,
            halfmove_clock,
            undo: Vec::new(),
        })
    }

    /// The underlying rules-engine board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// 64-bit Zobrist hash of the current position.
    pub fn hash(&self) -> u64 {
        self.board.get_hash()
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Number of moves currently applied on top of the initial position.
    pub fn game_ply(&self) -> usize {
        self.undo.len()
    }

    /// Return `true` if the current position occurred before with the same
    /// side to move since the last irreversible move.
    pub fn is_repetition(&self) -> bool {
        let hash = self.hash();
        self.undo
            .iter()
            .rev()
            .take(self.halfmove_clock as usize)
            .skip(1)
            .step_by(2)
            .any(|u| u.board.get_hash() == hash)
    }

    pub fn in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    /// Return `true` if `color` owns at least one knight, bishop, rook or queen.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_kings = *self.board.pieces(Piece::Pawn) | *self.board.pieces(Piece::King);
        (*self.board.color_combined(color) & !pawns_and_kings).popcnt() > 0
    }

    /// Bitboard of `color`'s pieces of kind `piece`.
    pub fn pieces(&self, piece: Piece, color: Color) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board.piece_on(sq)
    }

    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.board.color_on(sq)
    }

    /// Return `true` if `mv` removes an enemy piece (including en passant).
    pub fn is_capture(&self, mv: Move) -> bool {
        mv.is_en_passant() || (!mv.is_castle() && self.board.piece_on(mv.dest()).is_some())
    }

    /// All legal moves in generation order.
    pub fn legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        for cm in MoveGen::new_legal(&self.board) {
            list.push(self.classify(cm));
        }
        list
    }

    /// Legal captures and promotions, used at the quiescence horizon.
    ///
    /// Generation is restricted to enemy-occupied squares, the en passant
    /// target and the empty squares of the promotion rank.
    pub fn capture_moves(&self) -> MoveList {
        let us = self.side_to_move();
        let mut targets = *self.board.color_combined(!us);
        if let Some(victim) = self.board.en_passant() {
            targets |= BitBoard::from_square(victim.uforward(us));
        }
        let promotion_rank = match us {
            Color::White => Rank::Eighth,
            Color::Black => Rank::First,
        };
        targets |= get_rank(promotion_rank) & !*self.board.combined();

        let mut generator = MoveGen::new_legal(&self.board);
        generator.set_iterator_mask(targets);

        let mut list = MoveList::new();
        for cm in generator {
            let mv = self.classify(cm);
            // Pieces other than pawns may also land on the promotion rank.
            if mv.is_promotion() || self.is_capture(mv) {
                list.push(mv);
            }
        }
        list
    }

    /// Moves that get the side to move out of check.
    ///
    /// Only meaningful while [`in_check`](Self::in_check) holds, where every
    /// legal move is an evasion.
    pub fn evasion_moves(&self) -> MoveList {
        debug_assert!(self.in_check(), "evasion_moves called outside of check");
        self.legal_moves()
    }

    /// Apply a legal move in place.
    pub fn make_move(&mut self, mv: Move) {
        let cm = mv.to_chess_move();
        debug_assert!(self.board.legal(cm), "make_move called with illegal {mv}");

        let irreversible =
            self.board.piece_on(mv.source()) == Some(Piece::Pawn) || self.is_capture(mv);

        self.undo.push(Undo {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
            mv,
        });
        self.board = self.board.make_move_new(cm);
        self.halfmove_clock = if irreversible {
            0
        } else {
            self.halfmove_clock + 1
        };
    }

    /// Take back the most recent [`make_move`](Self::make_move).
    pub fn unmake_move(&mut self) {
        debug_assert!(!self.undo.is_empty(), "unmake_move without a matching make_move");
        if let Some(undo) = self.undo.pop() {
            self.board = undo.board;
            self.halfmove_clock = undo.halfmove_clock;
        }
    }

    /// The move that led to the current position, if any.
    pub fn previous_move(&self) -> Option<Move> {
        self.undo.last().map(|u| u.mv)
    }

    /// Parse a move in UCI notation and apply it if legal.
    pub fn make_uci_move(&mut self, text: &str) -> Result<Move, PositionError> {
        let mv = self
            .legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|mv| mv.to_string() == text)
            .ok_or_else(|| PositionError::IllegalMove {
                found: text.to_string(),
            })?;
        trace!(%mv, "applying move");
        self.make_move(mv);
        Ok(mv)
    }

    /// Tag a generated move with its kind.
    fn classify(&self, cm: ChessMove) -> Move {
        let (src, dst) = (cm.get_source(), cm.get_dest());

        if let Some(promo) = cm.get_promotion().and_then(PromotionPiece::from_piece) {
            return Move::new_promotion(src, dst, promo);
        }

        let changes_file = src.get_file() != dst.get_file();
        match self.board.piece_on(src) {
            Some(Piece::Pawn) if changes_file && self.board.piece_on(dst).is_none() => {
                Move::new_en_passant(src, dst)
            }
            Some(Piece::King)
                if src.get_file().to_index().abs_diff(dst.get_file().to_index()) == 2 =>
            {
                Move::new_castle(src, dst)
            }
            _ => Move::new(src, dst),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("board", &self.board.to_string())
            .field("halfmove_clock", &self.halfmove_clock)
            .field("game_ply", &self.undo.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chess::{Color, Square};

    use super::*;
    use crate::chess_move::MoveKind;

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::startpos();
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.side_to_move(), Color::White);
        assert!(!pos.in_check());
    }

    #[test]
    fn fen_reads_halfmove_clock() {
        let pos: Position = "8/8/4k3/8/8/4K3/8/8 w - - 37 80".parse().unwrap();
        assert_eq!(pos.halfmove_clock(), 37);
    }

    #[test]
    fn fen_rejects_bad_clock() {
        let err = Position::from_fen("8/8/4k3/8/8/4K3/8/8 w - - x 1").unwrap_err();
        assert!(matches!(err, PositionError::InvalidMoveCounter { .. }));
    }

    #[test]
    fn fen_rejects_field_count() {
        let err = Position::from_fen("8/8/8 w").unwrap_err();
        assert_eq!(err, PositionError::WrongFieldCount { found: 2 });
    }

    #[test]
    fn make_unmake_restores_hash_and_clock() {
        let mut pos: Position =
            "r3k2r/pppq1ppp/2np1n2/4p3/2B1P3/2NP1N2/PPPQ1PPP/R3K2R w KQkq - 5 9"
                .parse()
                .unwrap();
        let hash = pos.hash();
        let moves = pos.legal_moves();
        for &mv in &moves {
            pos.make_move(mv);
            pos.unmake_move();
            assert_eq!(pos.hash(), hash, "hash changed after {mv}");
            assert_eq!(pos.halfmove_clock(), 5);
        }
        assert_eq!(pos.previous_move(), None);
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_move() {
        let mut pos = Position::startpos();
        pos.make_uci_move("g1f3").unwrap();
        assert_eq!(pos.halfmove_clock(), 1);
        pos.make_uci_move("e7e5").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn classifies_special_moves() {
        let pos: Position = "r3k3/1P6/8/3pP3/8/8/8/4K2R w Kq d6 0 1".parse().unwrap();
        let moves = pos.legal_moves();
        let find = |uci: &str| {
            moves
                .as_slice()
                .iter()
                .copied()
                .find(|m| m.to_string() == uci)
                .unwrap()
        };
        assert_eq!(find("e5d6").kind(), MoveKind::EnPassant);
        assert_eq!(find("e1g1").kind(), MoveKind::Castling);
        assert_eq!(find("b7a8q").kind(), MoveKind::Promotion);
        assert_eq!(find("e5e6").kind(), MoveKind::Normal);
        assert!(pos.is_capture(find("e5d6")));
        assert!(pos.is_capture(find("b7a8q")));
        assert!(!pos.is_capture(find("e1g1")));
    }

    #[test]
    fn capture_moves_include_quiet_promotions() {
        let pos: Position = "4k3/P7/8/8/8/8/7r/4K3 w - - 0 1".parse().unwrap();
        let captures = pos.capture_moves();
        assert_eq!(captures.len(), 4);
        assert!(captures.as_slice().iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn capture_moves_match_filtered_legal_moves() {
        for fen in [
            "r3k3/1P6/8/3pP3/8/8/8/4K2R w Kq d6 0 1",
            "4k3/8/8/8/3Pp3/8/6p1/R3K3 b - d3 0 1",
        ] {
            let pos: Position = fen.parse().unwrap();
            let expected: Vec<Move> = pos
                .legal_moves()
                .as_slice()
                .iter()
                .copied()
                .filter(|&m| m.is_promotion() || pos.is_capture(m))
                .collect();
            let captures = pos.capture_moves();
            assert_eq!(captures.len(), expected.len(), "{fen}");
            assert!(expected.iter().all(|&m| captures.contains(m)), "{fen}");
            assert!(captures.as_slice().iter().any(|m| m.is_en_passant()), "{fen}");
        }

        let pos: Position = "r3k3/1P6/8/3pP3/8/8/8/4K2R w Kq d6 0 1".parse().unwrap();
        assert_eq!(pos.capture_moves().len(), 9);
    }

    #[test]
    fn detects_repetition() {
        let mut pos = Position::startpos();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            assert!(!pos.is_repetition());
            pos.make_uci_move(uci).unwrap();
        }
        assert!(pos.is_repetition());
    }

    #[test]
    fn repetition_ignores_positions_before_pawn_move() {
        let mut pos = Position::startpos();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"] {
            pos.make_uci_move(uci).unwrap();
        }
        assert!(!pos.is_repetition());
    }

    #[test]
    fn non_pawn_material() {
        let pos: Position = "4k3/pppp4/8/8/8/8/4P3/3NK3 w - - 0 1".parse().unwrap();
        assert!(pos.has_non_pawn_material(Color::White));
        assert!(!pos.has_non_pawn_material(Color::Black));
    }

    #[test]
    fn rejects_illegal_uci_move() {
        let mut pos = Position::startpos();
        assert!(pos.make_uci_move("e2e5").is_err());
        assert_eq!(pos.game_ply(), 0);
        assert_eq!(pos.piece_on(Square::E2), Some(Piece::Pawn));
    }
}
