//! # Adapters
//!
//! Port implementations: in-memory collaborators, staging overlays used to
//! make a genesis build all-or-nothing, and secp256k1 node identity.

pub mod identity;
pub mod memory;
pub mod staged;

pub use identity::Secp256k1AddressDeriver;
pub use memory::{InMemoryAccountState, InMemoryRestrictingLedger, InMemorySnapshotStore};
pub use staged::{AccountOp, StagedAccountState, StagedLedger, StagedSnapshot};
