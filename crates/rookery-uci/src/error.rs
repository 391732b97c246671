//! UCI protocol errors.

use rookery_core::PositionError;
use rookery_engine::EvalError;

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        #[source]
        source: PositionError,
    },

    /// A move in the `position` command is not legal in the position it is
    /// applied to.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        uci_move: String,
        #[source]
        source: PositionError,
    },

    /// A `go` parameter was given without its value.
    #[error("missing value for go parameter {param}")]
    MissingGoValue { param: String },

    /// A `go` parameter value is not a non-negative integer.
    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue { param: String, value: String },

    /// `setoption` without a `name`.
    #[error("malformed setoption command: missing name")]
    MalformedSetOption,

    /// The engine has no option with this name.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The option exists but the value does not fit it.
    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue { name: String, value: String },

    /// An evaluation parameter rejected its new value.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
