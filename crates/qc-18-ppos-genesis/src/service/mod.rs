//! # Service Layer
//!
//! Genesis construction: the hash-chained write path, the allowance schedule
//! and the builder that drives both.

pub mod allowance;
pub mod builder;
pub mod hash_chain;

pub use allowance::{AllowanceSchedule, GenesisAllowanceScheduler};
pub use builder::{GenesisOutcome, GenesisParams, GenesisStateBuilder, GenesisSummary, SkipReason};
pub use hash_chain::{fold_kv_hash, HashChainedStore};
