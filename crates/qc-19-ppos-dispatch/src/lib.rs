//! # qc-19-ppos-dispatch
//!
//! PPoS Contract Dispatch subsystem for Quantum-Chain.
//!
//! ## Role in System
//!
//! - **Function Routing**: maps a `u16` function code to a registered handler
//! - **Typed Arguments**: each handler declares a tuple of RLP-decodable parameters
//! - **Consensus-Safe Errors**: unknown codes and bad payloads fail the call, never the node
//! - **Zero Gas**: staking and governance system contracts charge no execution gas
//!
//! ## Call Envelope
//!
//! ```text
//! RLP list [ rlp(code: u16), rlp(arg_1), ..., rlp(arg_n) ]   n <= 12
//! ```
//!
//! ## Function Code Ranges
//!
//! - `code % 1000` in `0..100`: mutating (sent as a transaction)
//! - `code % 1000` in `100..200`: query (read-only call)
//! - anything else: reserved, cannot be registered

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::*;
