//! # Quantum-Chain PPoS Test Suite
//!
//! Cross-crate tests for genesis seeding (qc-18) and system-contract
//! dispatch (qc-19).
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Genesis output read back through dispatched queries
//! └── benches/           # Genesis build and dispatch throughput
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
