//! # Ports
//!
//! What the dispatcher needs from the execution context it runs handlers on.

pub mod outbound;

pub use outbound::*;
