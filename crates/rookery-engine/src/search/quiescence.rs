//! Quiescence search: resolve captures, promotions and checks at the horizon.

use rookery_core::Position;

use crate::search::negamax::{MATE_SCORE, MAX_PLY, SearchContext};
use crate::search::ordering::order_moves;

/// Fail-hard quiescence search.
///
/// The static evaluation is a lower bound the side to move can always claim
/// ("stand pat"), except that a side in check must answer the check: it
/// searches every evasion and is mated when there is none. Out of check only
/// captures and promotions are tried. No table lookups and no killers here.
pub(crate) fn quiescence(
    pos: &mut Position,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    if ctx.globals.should_stop() {
        return 0;
    }

    ctx.globals.increment_nodes();

    if ply >= MAX_PLY {
        return ctx.evaluator.evaluate(pos);
    }

    let stand_pat = ctx.evaluator.evaluate(pos);
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if stand_pat >= beta {
        return beta;
    }

    let mut moves = if pos.in_check() {
        let evasions = pos.evasion_moves();
        if evasions.is_empty() {
            return -MATE_SCORE + ply as i32;
        }
        evasions
    } else {
        pos.capture_moves()
    };

    order_moves(pos, &mut moves, None, [None; 2], ctx.evaluator);

    for &mv in &moves {
        pos.make_move(mv);
        let score = -quiescence(pos, -beta, -alpha, ply + 1, ctx);
        pos.unmake_move();

        if ctx.globals.is_stopped() {
            return 0;
        }

        if score > alpha {
            alpha = score;
            if alpha >= beta {
                break;
            }
        }
    }

    alpha
}

#[cfg(test)]
mod tests {
    use rookery_core::Position;

    use super::*;
    use crate::eval::Evaluator;
    use crate::search::control::SearchGlobals;
    use crate::search::negamax::INFINITE;
    use crate::search::stack::SearchStack;
    use crate::search::tt::TranspositionTable;
    use crate::time::SearchLimits;

    fn run(pos: &mut Position, alpha: i32, beta: i32) -> (i32, u64) {
        let tt = TranspositionTable::new(1);
        let evaluator = Evaluator::default();
        let mut globals = SearchGlobals::new(SearchLimits::default());
        globals.begin_session(pos.side_to_move());
        let mut stack = SearchStack::new();
        let mut ctx = SearchContext {
            tt: &tt,
            evaluator: &evaluator,
            globals: &globals,
            stack: &mut stack,
        };
        let score = quiescence(pos, alpha, beta, 0, &mut ctx);
        (score, globals.nodes())
    }

    #[test]
    fn quiet_position_returns_static_eval() {
        let mut pos = Position::startpos();
        let eval = Evaluator::default().evaluate(&pos);
        let (score, nodes) = run(&mut pos, -INFINITE, INFINITE);
        assert_eq!(score, eval);
        assert_eq!(nodes, 1);
    }

    #[test]
    fn stand_pat_fail_high_returns_beta() {
        let mut pos: Position = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1".parse().unwrap();
        let (score, _) = run(&mut pos, -INFINITE, 50);
        assert_eq!(score, 50);
    }

    #[test]
    fn wins_hanging_queen() {
        // White rook takes an undefended black queen.
        let mut pos: Position = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let eval = Evaluator::default();
        let stand_pat = eval.evaluate(&pos);
        let (score, nodes) = run(&mut pos, -INFINITE, INFINITE);
        assert!(score > stand_pat + 1000, "capture not found: {score} vs {stand_pat}");
        assert!(nodes > 1);
    }

    #[test]
    fn mated_in_check_without_evasions() {
        let mut pos: Position = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        let (score, _) = run(&mut pos, -INFINITE, INFINITE);
        assert_eq!(score, -MATE_SCORE);
    }

    #[test]
    fn position_is_restored() {
        let mut pos: Position = "4k3/8/2n5/3q4/4P3/8/8/3RK3 w - - 0 1".parse().unwrap();
        let hash = pos.hash();
        run(&mut pos, -INFINITE, INFINITE);
        assert_eq!(pos.hash(), hash);
        assert_eq!(pos.game_ply(), 0);
    }
}
