//! # Ports
//!
//! Driven interfaces of the genesis subsystem.

pub mod outbound;

pub use outbound::*;
