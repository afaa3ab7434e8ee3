//! # Outbound Ports (Driven Ports)
//!
//! Collaborators genesis writes through. The host node supplies production
//! implementations; `adapters` provides in-memory ones.

use crate::domain::{DerivationError, LedgerError, RestrictingPlan, StateError, StoreError};
use shared_types::{Address, NodeId, U256};

/// Base layer of the versioned snapshot store.
///
/// Genesis writes bypass block-scoped versioning and land directly in the
/// base database.
pub trait SnapshotStore: Send + Sync {
    /// Put a single key-value pair into the base database.
    fn put_base(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Get a value from the base database.
    fn get_base(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a batch atomically: either every pair lands or none does.
    ///
    /// Implementations must not leave a prefix of `writes` behind on error.
    fn put_base_batch(&mut self, writes: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError>;
}

/// Undo journal over in-process state.
///
/// Genesis marks account state and the ledger before committing to them and
/// reverts both if any later commit step fails.
pub trait Checkpoint {
    /// Mark the current contents. The id is valid until reverted past.
    fn checkpoint(&mut self) -> usize;

    /// Drop every change made since `id`, along with later checkpoints.
    fn revert_to_checkpoint(&mut self, id: usize);
}

/// Contract account state (statedb).
pub trait AccountState: Checkpoint + Send + Sync {
    fn set_state(&mut self, address: Address, key: &[u8], value: Vec<u8>)
        -> Result<(), StateError>;

    fn get_state(&self, address: Address, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError>;

    fn balance(&self, address: Address) -> Result<U256, StateError>;
}

/// Ledger of time-locked balances released at epoch boundaries.
pub trait RestrictingLedger: Checkpoint + Send + Sync {
    /// Record future releases for `account`.
    fn create_restricting_record(
        &mut self,
        account: Address,
        plans: &[RestrictingPlan],
    ) -> Result<(), LedgerError>;
}

/// Maps a node identity to its on-chain address.
pub trait AddressDeriver: Send + Sync {
    fn node_address(&self, node_id: &NodeId) -> Result<Address, DerivationError>;
}
