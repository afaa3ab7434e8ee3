//! # Error Types
//!
//! Dispatch failures are transactional: the call fails, the node keeps going.
//! Registration failures are wiring mistakes caught at startup.

use thiserror::Error;

// =============================================================================
// DISPATCH ERRORS
// =============================================================================

/// Errors returned by a contract call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError<E> {
    /// No handler is registered for the function code.
    #[error("unknown function code: {0}")]
    FunctionCodeUnknown(u16),

    /// The payload could not be decoded into the handler's argument types.
    ///
    /// `code` is `None` when the envelope itself (or its function code) is
    /// malformed.
    #[error("argument decode failed for {}: {reason}", describe_code(.code))]
    ArgumentDecode { code: Option<u16>, reason: String },

    /// The handler ran and returned an error. Passed through unchanged.
    #[error("{0}")]
    Handler(E),
}

fn describe_code(code: &Option<u16>) -> String {
    match code {
        Some(code) => format!("function {code}"),
        None => "call envelope".to_string(),
    }
}

impl<E> DispatchError<E> {
    /// The handler's own error, if the call got that far.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            Self::Handler(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// REGISTRATION ERRORS
// =============================================================================

/// Errors raised while building a dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("function code {0} is already registered")]
    DuplicateCode(u16),

    /// Code falls outside the mutating and query ranges.
    #[error("function code {0} is in a reserved range")]
    ReservedCode(u16),
}
