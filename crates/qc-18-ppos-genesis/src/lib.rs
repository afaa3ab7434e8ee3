//! # qc-18-ppos-genesis
//!
//! PPoS Genesis State subsystem for Quantum-Chain.
//!
//! ## Role in System
//!
//! - **Runs Once**: at block 0, before consensus starts
//! - **Ledger Seeding**: candidates, power index, first epoch and round validator queues
//! - **PPoS Hash**: rolling Keccak-256 digest over every staking write, stored as chain state
//! - **Plugin State**: reward pool year-end balance, governance active version, allowance plans
//!
//! ## Build Flow
//!
//! ```text
//! genesis.json ──→ [GenesisStateBuilder]
//!                         │
//!          ┌──────────────┼──────────────────┐
//!          ↓              ↓                  ↓
//!  [HashChainedStore] [AccountState]  [RestrictingLedger]
//!          │              │                  │
//!          ↓              ↓                  ↓
//!     snapshot base   PPOSHASH, plugin    allowance plans
//! ```
//!
//! ## Determinism
//!
//! Every node must arrive at the same PPoS hash from the same genesis. The
//! write order, key layout and RLP field order are consensus data.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::*;
