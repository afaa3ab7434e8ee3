//! # Error Types
//!
//! Errors raised while parsing shared value types.

use thiserror::Error;

/// Errors converting raw bytes or hex text into a fixed-width type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytesError {
    /// Input has the wrong number of bytes.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input is not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
