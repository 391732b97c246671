//! Integration tests for iterative deepening and the fixed-depth entry points.
//!
//! Covers move legality, mate reporting, window semantics, principal variation
//! validity and the two ways a running search can be cut short.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rookery_core::{Move, Position};
use rookery_engine::{ScoreReport, SearchGlobals, SearchInfo, SearchLimits, Searcher};

const SCHOLARS_MATE_FEN: &str =
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

const SICILIAN_FEN: &str = "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2";

const RUY_LOPEZ_FEN: &str = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";

const PAWN_ENDGAME_FEN: &str = "8/8/8/3k4/8/3K4/4P3/8 w - - 0 1";

/// Helper: iterative deepening to `depth`, collecting every report.
fn run_to_depth(pos: &mut Position, depth: u8) -> (Option<Move>, Vec<SearchInfo>) {
    let searcher = Searcher::new();
    let mut globals = SearchGlobals::new(SearchLimits::depth(depth));
    let mut infos = Vec::new();
    let best = searcher.best_move_search(pos, &mut globals, |info| infos.push(info.clone()));
    (best, infos)
}

// ── Basic correctness ─────────────────────────────────────────────────────────

#[test]
fn best_move_is_legal() {
    for fen in [SICILIAN_FEN, RUY_LOPEZ_FEN, PAWN_ENDGAME_FEN] {
        let mut pos: Position = fen.parse().unwrap();
        let (best, _) = run_to_depth(&mut pos, 4);
        let best = best.unwrap_or_else(|| panic!("no move for {fen}"));
        assert!(pos.legal_moves().contains(best), "illegal {best} for {fen}");
    }
}

#[test]
fn reports_mate_in_one() {
    let mut pos: Position = SCHOLARS_MATE_FEN.parse().unwrap();
    let (best, infos) = run_to_depth(&mut pos, 4);
    assert_eq!(best.map(|m| m.to_uci()).as_deref(), Some("h5f7"));
    for info in &infos {
        assert_eq!(info.score, ScoreReport::Mate(1), "depth {}", info.depth);
    }
}

#[test]
fn search_restores_position() {
    let mut pos: Position = RUY_LOPEZ_FEN.parse().unwrap();
    let hash = pos.hash();
    run_to_depth(&mut pos, 4);
    assert_eq!(pos.hash(), hash);
    assert_eq!(pos.game_ply(), 0);
    assert_eq!(pos.halfmove_clock(), 3);
}

#[test]
fn every_principal_variation_replays_legally() {
    let mut pos: Position = SICILIAN_FEN.parse().unwrap();
    let (_, infos) = run_to_depth(&mut pos, 5);
    assert_eq!(infos.len(), 5);

    for info in &infos {
        let mut replay = pos.clone();
        for &mv in &info.pv {
            assert!(
                replay.legal_moves().contains(mv),
                "depth {}: {mv} is not legal in the line",
                info.depth
            );
            replay.make_move(mv);
        }
    }
}

#[test]
fn node_counts_grow_with_depth() {
    let mut pos = Position::startpos();
    let (_, infos) = run_to_depth(&mut pos, 4);
    for pair in infos.windows(2) {
        assert!(pair[1].nodes > pair[0].nodes);
    }
}

// ── Window semantics ──────────────────────────────────────────────────────────

#[test]
fn windows_bound_the_true_score() {
    for depth in 1..=2 {
        let mut pos: Position = PAWN_ENDGAME_FEN.parse().unwrap();
        let exact = Searcher::new().search(&mut pos, depth).score;

        let low = Searcher::new().search_window(&mut pos, exact + 10, exact + 50, depth);
        assert!(low.score <= exact + 10, "fail low expected at depth {depth}");

        let high = Searcher::new().search_window(&mut pos, exact - 50, exact - 10, depth);
        assert!(high.score >= exact - 10, "fail high expected at depth {depth}");

        let inside = Searcher::new().search_window(&mut pos, exact - 20, exact + 20, depth);
        assert_eq!(inside.score, exact, "depth {depth}");
    }
}

#[test]
fn repeated_search_reuses_table_consistently() {
    let searcher = Searcher::new();
    let mut pos: Position = SCHOLARS_MATE_FEN.parse().unwrap();
    let first = searcher.search(&mut pos, 3);
    let second = searcher.search(&mut pos, 3);
    assert_eq!(first.score, second.score);

    searcher.clear_tt();
    let cleared = searcher.search(&mut pos, 3);
    assert_eq!(cleared.score, first.score);
}

// ── Stopping ──────────────────────────────────────────────────────────────────

#[test]
fn move_time_bounds_the_search() {
    let mut pos = Position::startpos();
    let searcher = Searcher::new();
    let mut globals = SearchGlobals::new(SearchLimits::move_time(Duration::from_millis(50)));

    let start = Instant::now();
    let best = searcher.best_move_search(&mut pos, &mut globals, |_| {});
    let elapsed = start.elapsed();

    assert!(best.is_some());
    assert!(elapsed < Duration::from_secs(2), "search ran {elapsed:?}");
}

#[test]
fn clock_budget_ends_session_soon_after_it_elapses() {
    // One second left, no increment: 1000 / 30 = 33 ms for this move.
    let limits = SearchLimits {
        white_time: Some(Duration::from_millis(1000)),
        white_increment: Some(Duration::ZERO),
        ..SearchLimits::default()
    };
    let mut pos = Position::startpos();
    let searcher = Searcher::new();
    let mut globals = SearchGlobals::new(limits);

    let start = Instant::now();
    let best = searcher.best_move_search(&mut pos, &mut globals, |_| {});
    let elapsed = start.elapsed();

    assert_eq!(globals.budget(), Some(Duration::from_millis(33)));
    assert!(best.is_some());
    assert!(elapsed >= Duration::from_millis(33), "stopped early after {elapsed:?}");
    assert!(elapsed < Duration::from_millis(500), "overran budget: {elapsed:?}");
}

#[test]
fn external_stop_ends_infinite_search() {
    let mut pos: Position = RUY_LOPEZ_FEN.parse().unwrap();
    let stop = Arc::new(AtomicBool::new(false));
    let limits = SearchLimits {
        infinite: true,
        ..SearchLimits::default()
    };
    let mut globals = SearchGlobals::with_stop_flag(limits, Arc::clone(&stop));
    let searcher = Searcher::new();

    let stopper = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            stop.store(true, Ordering::Relaxed);
        })
    };

    let start = Instant::now();
    let best = searcher.best_move_search(&mut pos, &mut globals, |_| {});
    stopper.join().unwrap();

    assert!(best.is_some());
    assert!(pos.legal_moves().contains(best.unwrap()));
    assert!(start.elapsed() < Duration::from_secs(5));
}
