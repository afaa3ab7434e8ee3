//! # Integration Tests
//!
//! Genesis-seeded stores queried through the staking contract dispatcher.

pub mod staking_queries;
