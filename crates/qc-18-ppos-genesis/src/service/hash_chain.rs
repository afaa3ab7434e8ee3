//! # Hash-Chained Store
//!
//! Write-through wrapper that folds every `put` into a rolling digest:
//!
//! ```text
//! acc_0 = 0x00…00
//! acc_n = keccak256( rlp_bytes( key_n ‖ value_n ‖ acc_{n-1} ) )
//! ```
//!
//! The concatenation is RLP-encoded as a single byte string before hashing.
//! Every node computes this digest independently at genesis and the result is
//! stored as consensus state, so the fold must be reproduced byte for byte.
//! Writes are folded per call: writing identical bytes twice folds twice.

use crate::domain::StoreError;
use crate::ports::SnapshotStore;
use shared_types::{keccak256, Hash, ZERO_HASH};

/// Fold one key/value write into the previous accumulator.
#[must_use]
pub fn fold_kv_hash(key: &[u8], value: &[u8], previous: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(key.len() + value.len() + previous.len());
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);
    buf.extend_from_slice(previous);
    keccak256(&rlp::encode(&buf))
}

/// Snapshot store wrapper maintaining the PPoS hash accumulator.
///
/// Scoped to one genesis build: create, write, then `finish` to take the
/// digest. The accumulator is never persisted by this type.
pub struct HashChainedStore<'a, S: SnapshotStore + ?Sized> {
    inner: &'a mut S,
    current: Hash,
    writes: usize,
}

impl<'a, S: SnapshotStore + ?Sized> HashChainedStore<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            current: ZERO_HASH,
            writes: 0,
        }
    }

    /// Write through, then fold. A failed write leaves the accumulator untouched.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<Hash, StoreError> {
        self.inner.put_base(key, value)?;
        self.current = fold_kv_hash(key, value, &self.current);
        self.writes += 1;
        tracing::debug!(
            pposhash = %hex::encode(self.current),
            key = %hex::encode(key),
            "[qc-18] Folded genesis write #{}",
            self.writes
        );
        Ok(self.current)
    }

    #[must_use]
    pub fn current_hash(&self) -> Hash {
        self.current
    }

    /// Number of writes folded so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Release the store and return the final digest.
    #[must_use]
    pub fn finish(self) -> Hash {
        self.current
    }
}
