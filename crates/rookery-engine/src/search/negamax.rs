//! Negamax alpha-beta search with principal variation search.

use rookery_core::{Move, Position};

use crate::eval::Evaluator;
use crate::search::control::SearchGlobals;
use crate::search::ordering::{is_quiet, order_moves};
use crate::search::quiescence::quiescence;
use crate::search::stack::SearchStack;
use crate::search::tt::{Bound, TranspositionTable, score_from_tt, score_to_tt};

/// Maximum search depth in plies; also the size of the search stack.
pub const MAX_PLY: usize = 128;

/// A window bound no real score reaches.
pub const INFINITE: i32 = 30_001;

/// Score of delivering mate at the root; mate at ply `p` scores `MATE_SCORE - p`.
pub const MATE_SCORE: i32 = 30_000;

/// Scores at or beyond this magnitude announce a forced mate.
pub const MAX_MATE_SCORE: i32 = MATE_SCORE - MAX_PLY as i32;

/// Static pruning only applies below this remaining depth.
const STATIC_PRUNE_DEPTH: i32 = 3;

/// Static pruning margin per ply of remaining depth.
const STATIC_PRUNE_MARGIN: i32 = 150;

/// Score and principal variation of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Score from the point of view of the side to move at the node.
    pub score: i32,
    /// Best line from the node, when one was recorded.
    pub pv: Option<Vec<Move>>,
}

impl SearchResult {
    /// A bare score with no line.
    pub const fn score(score: i32) -> Self {
        Self { score, pv: None }
    }

    /// The same result seen from the parent: score negated, line kept.
    pub fn negated(self) -> Self {
        Self {
            score: -self.score,
            pv: self.pv,
        }
    }
}

/// Everything a node needs besides the position and its window.
pub(crate) struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub evaluator: &'a Evaluator,
    pub globals: &'a SearchGlobals,
    pub stack: &'a mut SearchStack,
}

/// Fail-soft negamax search of `pos` to `depth` plies.
///
/// `pos` is restored to its original state before returning. Once the stop
/// flag is raised every node, the root included, unwinds with a neutral
/// `{0, None}` and skips its table write.
pub(crate) fn negamax(
    pos: &mut Position,
    mut alpha: i32,
    mut beta: i32,
    depth: i32,
    ply: usize,
    ctx: &mut SearchContext<'_>,
) -> SearchResult {
    if depth <= 0 {
        return SearchResult::score(quiescence(pos, alpha, beta, ply, ctx));
    }

    if ply > 0 {
        if ctx.globals.should_stop() {
            return SearchResult::score(0);
        }

        if pos.halfmove_clock() >= 100 || pos.is_repetition() {
            return SearchResult::score(0);
        }

        if ply >= MAX_PLY {
            return SearchResult::score(ctx.evaluator.evaluate(pos));
        }

        // Mate distance pruning
        alpha = alpha.max(-MATE_SCORE + ply as i32);
        beta = beta.min(MATE_SCORE - ply as i32);
        if alpha >= beta {
            return SearchResult::score(alpha);
        }
    }

    let pv_node = beta - alpha > 1;

    let hash = pos.hash();
    let entry = ctx.tt.probe(hash);
    let mut tt_move = None;
    if entry.key == hash && entry.bound != Bound::None {
        tt_move = entry.best_move;
        let score = score_from_tt(entry.score, ply);
        if !pv_node && entry.depth as i32 >= depth {
            let cutoff = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
                Bound::None => false,
            };
            if cutoff {
                return SearchResult::score(score);
            }
        }
    }

    if !pv_node
        && depth < STATIC_PRUNE_DEPTH
        && pos.has_non_pawn_material(pos.side_to_move())
        && !pos.in_check()
        && pos.previous_move().is_some()
        && beta > -MAX_MATE_SCORE
    {
        let eval = ctx.evaluator.evaluate(pos);
        if eval - STATIC_PRUNE_MARGIN * depth >= beta {
            return SearchResult::score(eval);
        }
    }

    ctx.globals.increment_nodes();

    let mut moves = pos.legal_moves();
    if moves.is_empty() {
        let score = if pos.in_check() {
            -MATE_SCORE + ply as i32
        } else {
            0
        };
        return SearchResult::score(score);
    }

    order_moves(pos, &mut moves, tt_move, ctx.stack.killers(ply), ctx.evaluator);

    let original_alpha = alpha;
    let mut best_score = -INFINITE;
    let mut best_move = None;
    let mut pv = None;

    for (index, &mv) in moves.as_slice().iter().enumerate() {
        let quiet = is_quiet(pos, mv);

        pos.make_move(mv);
        let result = if index == 0 {
            negamax(pos, -beta, -alpha, depth - 1, ply + 1, ctx).negated()
        } else {
            let scout = negamax(pos, -alpha - 1, -alpha, depth - 1, ply + 1, ctx).negated();
            // A null window leaves nothing for a full-window search to add.
            if scout.score > alpha && beta - alpha > 1 {
                negamax(pos, -beta, -alpha, depth - 1, ply + 1, ctx).negated()
            } else {
                scout
            }
        };
        pos.unmake_move();

        if ctx.globals.is_stopped() {
            return SearchResult::score(0);
        }

        if result.score > best_score {
            best_score = result.score;
            best_move = Some(mv);

            if best_score > alpha {
                alpha = best_score;

                if pv_node {
                    let mut line = vec![mv];
                    line.extend(result.pv.unwrap_or_default());
                    pv = Some(line);
                }

                if alpha >= beta {
                    if quiet {
                        ctx.stack.store_killer(ply, mv);
                    }
                    break;
                }
            }
        }
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score <= original_alpha {
        Bound::Upper
    } else {
        Bound::Exact
    };

    // A fail-low has no trustworthy best move; keep the older hint.
    let stored_move = match bound {
        Bound::Upper => tt_move.or(best_move),
        _ => best_move,
    };
    ctx.tt.write(
        stored_move,
        bound,
        depth.clamp(0, u8::MAX as i32) as u8,
        score_to_tt(best_score, ply),
        hash,
    );

    SearchResult {
        score: best_score,
        pv,
    }
}
