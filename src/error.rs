//! Error types for transcript reconstruction

use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// Fatal conditions that abort a run.
///
/// Unfamiliar escape sequences are never errors; they go to the
/// [`DiagnosticSink`](crate::DiagnosticSink) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A cursor-position (`H`) sequence with a parameter count other than 0 or 2
    #[error("cursor position sequence {sequence} has {count} parameters, expected 0 or 2")]
    CursorPositionArity {
        /// Number of parameters found
        count: usize,
        /// Escaped source bytes of the offending sequence
        sequence: String,
    },

    /// Input ended before the terminator of a CSI or DCS sequence
    #[error("input ended inside an unterminated {kind} sequence starting at byte {offset}")]
    UnterminatedSequence {
        /// Sequence kind ("CSI" or "DCS")
        kind: &'static str,
        /// Offset of the introducing ESC byte
        offset: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Screen dump serialization failed
    #[error("failed to serialize screen: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for transcript operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render raw bytes the way notices and errors quote them (`\x1b[5t`).
pub fn escape_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}
