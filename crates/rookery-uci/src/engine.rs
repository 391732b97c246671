//! Event-driven UCI engine running its search on a worker thread.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{debug, info, warn};

use rookery_core::{Move, Position};
use rookery_engine::eval::params::{PARAM_MAX, PARAM_MIN, PARAM_NAMES};
use rookery_engine::{DEFAULT_HASH_MB, EvalParams, SearchGlobals, SearchInfo, Searcher};

use crate::command::{Command, GoParams, parse_command};
use crate::error::UciError;

/// Smallest accepted `Hash` value in megabytes.
pub const MIN_HASH_MB: usize = 1;
/// Largest accepted `Hash` value in megabytes.
pub const MAX_HASH_MB: usize = 65_536;

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
    /// Evaluation weights.
    pub params: EvalParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
            params: EvalParams::default(),
        }
    }
}

impl EngineConfig {
    /// Apply one `setoption`. Names are matched case-insensitively.
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<ConfigChange, UciError> {
        let value = value.unwrap_or_default();
        let invalid = || UciError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        };

        if name.eq_ignore_ascii_case("Hash") {
            let mb: usize = value.parse().map_err(|_| invalid())?;
            if !(MIN_HASH_MB..=MAX_HASH_MB).contains(&mb) {
                return Err(invalid());
            }
            self.hash_mb = mb;
            return Ok(ConfigChange::Hash);
        }

        let param = PARAM_NAMES
            .iter()
            .copied()
            .find(|param| param.eq_ignore_ascii_case(name))
            .ok_or_else(|| UciError::UnknownOption(name.to_string()))?;
        let v: i32 = value.parse().map_err(|_| invalid())?;
        self.params.set(param, v)?;
        Ok(ConfigChange::Eval)
    }
}

/// Which part of the searcher a configuration change affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Hash,
    Eval,
}

/// Render one `info` line.
pub fn format_info(info: &SearchInfo) -> String {
    let pv = info
        .pv
        .iter()
        .map(|mv| mv.to_uci())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "info depth {} score {} time {} nodes {} nps {} pv {}",
        info.depth,
        info.score,
        info.elapsed.as_millis(),
        info.nodes,
        info.nps,
        pv
    )
}

/// Render the `bestmove` line, falling back to the first legal move when the
/// search returned nothing.
pub fn format_bestmove(best: Option<Move>, position: &Position) -> String {
    let mv = best.or_else(|| {
        let fallback = position.legal_moves().as_slice().first().copied();
        if let Some(mv) = fallback {
            warn!(%mv, "search returned no move, playing first legal move");
        }
        fallback
    });
    match mv {
        Some(mv) => format!("bestmove {mv}"),
        None => "bestmove 0000".to_string(),
    }
}

/// Internal engine state.
enum EngineState {
    Idle,
    Searching,
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
}

/// Payload returned by the search thread when it finishes.
struct SearchDone {
    bestmove: String,
    searcher: Searcher,
}

/// The UCI engine, holding the current position and the searcher.
///
/// Runs an event-driven loop on the main thread, dispatching searches
/// to a worker thread and processing UCI commands concurrently.
pub struct UciEngine {
    position: Position,
    searcher: Option<Searcher>,
    state: EngineState,
    stop_flag: Arc<AtomicBool>,
    config: EngineConfig,
    pending_clear_tt: bool,
    /// Changes to apply when the search thread returns the searcher.
    pending_hash: bool,
    pending_eval: bool,
}

impl UciEngine {
    /// Create a new engine with the starting position.
    pub fn new() -> Self {
        Self {
            position: Position::startpos(),
            searcher: Some(Searcher::new()),
            state: EngineState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            config: EngineConfig::default(),
            pending_clear_tt: false,
            pending_hash: false,
            pending_eval: false,
        }
    }

    /// Run the UCI event loop, reading from stdin until `quit` or input closes.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(cmd = %trimmed, "received UCI command");
                        let cmd = parse_command(trimmed);
                        if stdin_tx.send(EngineEvent::UciCommand(cmd)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %UciError::from(e), "stdin read failed");
                        break;
                    }
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => println!("readyok"),
                    Command::UciNewGame => self.handle_ucinewgame(),
                    Command::Position(position) => self.position = position,
                    Command::Go(params) => self.handle_go(params, &tx),
                    Command::SetOption { name, value } => {
                        self.handle_setoption(&name, value.as_deref())
                    }
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        if matches!(self.state, EngineState::Searching) {
                            self.handle_stop();
                            for ev in &rx {
                                if let EngineEvent::SearchDone(done) = ev {
                                    self.finish_search(done);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(_) => {}
                },
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "UCI parse error");
                }
                EngineEvent::SearchDone(done) => self.finish_search(done),
                EngineEvent::InputClosed => break,
            }
        }

        info!("rookery shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name rookery");
        println!("id author the rookery developers");
        println!(
            "option name Hash type spin default {DEFAULT_HASH_MB} min {MIN_HASH_MB} max {MAX_HASH_MB}"
        );
        for (name, value) in EvalParams::default().iter() {
            println!("option name {name} type spin default {value} min {PARAM_MIN} max {PARAM_MAX}");
        }
        println!("uciok");
    }

    fn handle_ucinewgame(&mut self) {
        self.position = Position::startpos();
        match self.searcher {
            Some(ref searcher) => searcher.clear_tt(),
            // Search thread owns the searcher; defer until it comes back
            None => self.pending_clear_tt = true,
        }
    }

    fn handle_setoption(&mut self, name: &str, value: Option<&str>) {
        let change = match self.config.set(name, value) {
            Ok(change) => change,
            Err(e) => {
                warn!(error = %e, "setoption rejected");
                return;
            }
        };
        debug!(name, value, "option set");

        match (change, self.searcher.as_mut()) {
            (ConfigChange::Hash, Some(searcher)) => searcher.resize_tt(self.config.hash_mb),
            (ConfigChange::Eval, Some(searcher)) => {
                *searcher.evaluator_mut().params_mut() = self.config.params;
            }
            (ConfigChange::Hash, None) => self.pending_hash = true,
            (ConfigChange::Eval, None) => self.pending_eval = true,
        }
    }

    fn handle_go(&mut self, params: GoParams, tx: &mpsc::Sender<EngineEvent>) {
        let Some(searcher) = self.searcher.take() else {
            warn!("go received while searching, ignoring");
            return;
        };

        self.stop_flag = Arc::new(AtomicBool::new(false));
        let mut globals = SearchGlobals::with_stop_flag(params.to_limits(), Arc::clone(&self.stop_flag));
        let mut position = self.position.clone();
        let tx = tx.clone();

        std::thread::spawn(move || {
            let best = searcher.best_move_search(&mut position, &mut globals, |info| {
                println!("{}", format_info(info));
            });
            let bestmove = format_bestmove(best, &position);
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { bestmove, searcher }));
        });

        self.state = EngineState::Searching;
    }

    fn handle_stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    fn finish_search(&mut self, done: SearchDone) {
        let mut searcher = done.searcher;

        if std::mem::take(&mut self.pending_hash) {
            // A fresh allocation is already empty
            searcher.resize_tt(self.config.hash_mb);
            self.pending_clear_tt = false;
        } else if std::mem::take(&mut self.pending_clear_tt) {
            searcher.clear_tt();
        }
        if std::mem::take(&mut self.pending_eval) {
            *searcher.evaluator_mut().params_mut() = self.config.params;
        }

        self.searcher = Some(searcher);
        println!("{}", done.bestmove);
        self.state = EngineState::Idle;
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rookery_engine::ScoreReport;

    use super::*;

    #[test]
    fn config_sets_hash() {
        let mut config = EngineConfig::default();
        assert_eq!(config.set("Hash", Some("64")).unwrap(), ConfigChange::Hash);
        assert_eq!(config.hash_mb, 64);
        assert_eq!(config.set("hash", Some("1")).unwrap(), ConfigChange::Hash);
        assert_eq!(config.hash_mb, 1);
    }

    #[test]
    fn config_rejects_bad_hash() {
        let mut config = EngineConfig::default();
        assert!(matches!(
            config.set("Hash", Some("0")),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            config.set("Hash", Some("lots")),
            Err(UciError::InvalidOptionValue { .. })
        ));
        assert!(config.set("Hash", None).is_err());
        assert_eq!(config.hash_mb, DEFAULT_HASH_MB);
    }

    #[test]
    fn config_sets_eval_param() {
        let mut config = EngineConfig::default();
        assert_eq!(config.set("PawnMG", Some("100")).unwrap(), ConfigChange::Eval);
        assert_eq!(config.params.get("PawnMG").unwrap(), 100);
        assert_eq!(config.set("rook7thrankeg", Some("-7")).unwrap(), ConfigChange::Eval);
        assert_eq!(config.params.get("Rook7thRankEG").unwrap(), -7);
    }

    #[test]
    fn config_rejects_unknown_or_out_of_range() {
        let mut config = EngineConfig::default();
        assert!(matches!(
            config.set("Threads", Some("4")),
            Err(UciError::UnknownOption(_))
        ));
        assert!(matches!(
            config.set("PawnMG", Some("99999")),
            Err(UciError::Eval(_))
        ));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn info_line_layout() {
        let pos = Position::startpos();
        let moves = pos.legal_moves();
        let info = SearchInfo {
            depth: 3,
            score: ScoreReport::Centipawns(25),
            elapsed: Duration::from_millis(12),
            nodes: 1200,
            nps: 100_000,
            pv: vec![moves[0], moves[1]],
        };
        assert_eq!(
            format_info(&info),
            format!(
                "info depth 3 score cp 25 time 12 nodes 1200 nps 100000 pv {} {}",
                moves[0], moves[1]
            )
        );
    }

    #[test]
    fn bestmove_fallbacks() {
        let pos = Position::startpos();
        let first = pos.legal_moves()[0];
        assert_eq!(format_bestmove(None, &pos), format!("bestmove {first}"));

        let mated: Position = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert_eq!(format_bestmove(None, &mated), "bestmove 0000");

        let chosen = pos.legal_moves()[5];
        assert_eq!(format_bestmove(Some(chosen), &pos), format!("bestmove {chosen}"));
    }
}
