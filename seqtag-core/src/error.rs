//! Structured error types for the seqtag crates.

use thiserror::Error;

/// Unified error type for all seqtag operations.
///
/// The library does no I/O and skips malformed training input silently, so
/// invalid arguments are the only failure it can produce.
#[derive(Debug, Error)]
pub enum SeqtagError {
    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias used throughout the seqtag crates.
pub type Result<T> = std::result::Result<T, SeqtagError>;
