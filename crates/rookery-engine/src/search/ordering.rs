//! Move ordering: TT move, captures by value difference, killers, quiets.

use rookery_core::{Move, MoveList, Piece, Position};

use crate::eval::Evaluator;

/// Priority of the move stored in the transposition table.
pub const TT_MOVE_SCORE: i32 = 20_000;
/// Base for en passant and captures worth at least a pawn minus 50.
pub const GOOD_CAPTURE_BASE: i32 = 10_000;
/// Base for every other capture or promotion.
pub const BAD_CAPTURE_BASE: i32 = 5_000;
/// Priority of the most recent killer.
pub const KILLER_0_SCORE: i32 = 7_001;
/// Priority of the older killer.
pub const KILLER_1_SCORE: i32 = 7_000;

/// Good captures gain at least a pawn minus this margin.
const GOOD_CAPTURE_MARGIN: i32 = 50;
/// Extra credit for en passant on top of the pawn it wins.
const EN_PASSANT_BONUS: i32 = 20;

/// Return `true` for moves eligible as killers: no capture, no en passant,
/// no promotion.
pub fn is_quiet(pos: &Position, mv: Move) -> bool {
    !mv.is_promotion() && !pos.is_capture(mv)
}

/// Ordering priority of `mv`; higher is searched first.
///
/// Capture value is `victim - mover` in middlegame material, plus the gain of
/// the promoted piece over a pawn for promotions.
pub fn move_priority(
    pos: &Position,
    mv: Move,
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    evaluator: &Evaluator,
) -> i32 {
    if tt_move == Some(mv) {
        return TT_MOVE_SCORE;
    }

    let pawn = evaluator.piece_value(Piece::Pawn);
    if mv.is_en_passant() {
        return GOOD_CAPTURE_BASE + pawn + EN_PASSANT_BONUS;
    }

    if mv.is_promotion() || pos.is_capture(mv) {
        let value = |piece: Option<Piece>| piece.map_or(0, |p| evaluator.piece_value(p));
        let victim = value(pos.piece_on(mv.dest()));
        let mover = value(pos.piece_on(mv.source()));
        let promotion = mv
            .promotion()
            .map_or(0, |p| evaluator.piece_value(p.to_piece()) - pawn);
        let capture_value = victim + promotion - mover;

        return if capture_value >= pawn - GOOD_CAPTURE_MARGIN {
            GOOD_CAPTURE_BASE + capture_value
        } else {
            BAD_CAPTURE_BASE + capture_value
        };
    }

    if killers[0] == Some(mv) {
        KILLER_0_SCORE
    } else if killers[1] == Some(mv) {
        KILLER_1_SCORE
    } else {
        0
    }
}

/// Sort `moves` in place by descending priority, keeping generation order
/// among equals.
pub fn order_moves(
    pos: &Position,
    moves: &mut MoveList,
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    evaluator: &Evaluator,
) {
    moves.sort_by_priority(|mv| move_priority(pos, mv, tt_move, killers, evaluator));
}

#[cfg(test)]
mod tests {
    use rookery_core::{Move, Position};

    use super::*;

    fn find(pos: &Position, uci: &str) -> Move {
        pos.legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to_string() == uci)
            .unwrap()
    }

    #[test]
    fn tt_move_goes_first() {
        let pos = Position::startpos();
        let eval = Evaluator::default();
        let tt_move = find(&pos, "h2h3");
        let mut moves = pos.legal_moves();
        order_moves(&pos, &mut moves, Some(tt_move), [None; 2], &eval);
        assert_eq!(moves[0], tt_move);
    }

    #[test]
    fn quiet_moves_keep_generation_order() {
        let pos = Position::startpos();
        let eval = Evaluator::default();
        let generated = pos.legal_moves();
        let mut sorted = pos.legal_moves();
        order_moves(&pos, &mut sorted, None, [None; 2], &eval);
        assert_eq!(generated.as_slice(), sorted.as_slice());
    }

    #[test]
    fn capture_classes_and_killers() {
        // exd5 wins a knight for a pawn; Nxd5 is an even trade, which still
        // falls below the good-capture bound of pawn - 50.
        let pos: Position = "4k3/3p4/2p5/3n4/4P3/2N5/8/3QK3 w - - 0 1".parse().unwrap();
        let eval = Evaluator::default();
        let pawn = eval.piece_value(Piece::Pawn);
        let knight = eval.piece_value(Piece::Knight);

        let pawn_takes = find(&pos, "e4d5");
        let knight_takes = find(&pos, "c3d5");
        let killer = find(&pos, "c3b5");
        let quiet = find(&pos, "e1f1");
        let killers = [Some(killer), None];

        assert_eq!(
            move_priority(&pos, pawn_takes, None, killers, &eval),
            GOOD_CAPTURE_BASE + knight - pawn
        );
        assert_eq!(
            move_priority(&pos, knight_takes, None, killers, &eval),
            BAD_CAPTURE_BASE
        );
        assert_eq!(move_priority(&pos, killer, None, killers, &eval), KILLER_0_SCORE);
        assert_eq!(move_priority(&pos, quiet, None, killers, &eval), 0);

        let mut moves = pos.legal_moves();
        order_moves(&pos, &mut moves, None, killers, &eval);
        assert_eq!(moves[0], pawn_takes);
        assert_eq!(moves[1], killer);
        assert_eq!(moves[2], knight_takes);
    }

    #[test]
    fn en_passant_and_promotion() {
        let pos: Position = "4k3/1P6/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let eval = Evaluator::default();
        let pawn = eval.piece_value(Piece::Pawn);

        let ep = find(&pos, "e5d6");
        assert_eq!(
            move_priority(&pos, ep, None, [None; 2], &eval),
            GOOD_CAPTURE_BASE + pawn + 20
        );

        let queen = find(&pos, "b7b8q");
        let knight = find(&pos, "b7b8n");
        let q = move_priority(&pos, queen, None, [None; 2], &eval);
        let n = move_priority(&pos, knight, None, [None; 2], &eval);
        assert_eq!(q, GOOD_CAPTURE_BASE + eval.piece_value(Piece::Queen) - 2 * pawn);
        assert!(q > n);
    }

    #[test]
    fn quiet_classification() {
        let pos: Position = "4k3/1P6/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        assert!(!is_quiet(&pos, find(&pos, "e5d6")));
        assert!(!is_quiet(&pos, find(&pos, "b7b8q")));
        assert!(is_quiet(&pos, find(&pos, "e5e6")));
        assert!(is_quiet(&pos, find(&pos, "e1d2")));
    }
}
