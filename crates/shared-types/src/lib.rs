//! # Shared Types Crate
//!
//! Primitive value types used by both PPoS subsystems (genesis state and
//! precompile dispatch).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: byte widths of consensus identifiers are
//!   defined once, here.
//! - **Codec Neutral**: every fixed-width type encodes as a plain RLP byte
//!   string and serializes to JSON as `0x`-prefixed hex.

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod system;

pub use entities::*;
pub use errors::*;
pub use hashing::*;
pub use system::*;
