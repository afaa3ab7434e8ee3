//! Keccak-256 helpers.

use crate::entities::Hash;
use sha3::{Digest, Keccak256};

/// Compute Keccak256 hash.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
