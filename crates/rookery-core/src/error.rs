//! Error types for position setup and move parsing.

/// Errors raised while building a [`Position`](crate::Position) or applying
/// externally supplied moves to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string has too few or too many space-separated fields.
    #[error("expected 4 to 6 FEN fields, found {found}")]
    WrongFieldCount {
        /// Number of fields found.
        found: usize,
    },
    /// The rules engine rejected the piece placement, side, castling or en
    /// passant fields.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The rejected FEN string.
        fen: String,
        /// Reason given by the rules engine.
        reason: String,
    },
    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// The field name ("halfmove clock" or "fullmove number").
        field: &'static str,
        /// The invalid string.
        found: String,
    },
    /// A move string is not legal in the current position.
    #[error("illegal move \"{found}\"")]
    IllegalMove {
        /// The rejected move text.
        found: String,
    },
}
