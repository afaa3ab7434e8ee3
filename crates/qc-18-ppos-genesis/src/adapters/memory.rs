//! In-memory adapters for tests and tooling.
//!
//! Production nodes back these ports with the versioned snapshot database and
//! the state trie.

use crate::domain::{LedgerError, RestrictingPlan, StateError, StoreError};
use crate::ports::{AccountState, Checkpoint, RestrictingLedger, SnapshotStore};
use shared_types::{Address, U256};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// Ordered in-memory base database.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Successful writes left before every write fails. `None` never fails.
    write_budget: Option<usize>,
    writes: usize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts `writes` puts and then fails every write.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            write_budget: Some(writes),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Accepted put calls, including overwrites.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// All pairs whose key starts with `prefix`, in key order.
    pub fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn spend_budget(&mut self) -> Result<(), StoreError> {
        match self.write_budget.as_mut() {
            Some(0) => Err(StoreError::DatabaseError("write budget exhausted".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put_base(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.spend_budget()?;
        self.data.insert(key.to_vec(), value.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn get_base(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put_base_batch(&mut self, writes: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError> {
        if let Some(left) = self.write_budget {
            if left < writes.len() {
                return Err(StoreError::BatchRejected {
                    failed_at: left,
                    total: writes.len(),
                });
            }
            self.write_budget = Some(left - writes.len());
        }
        for (key, value) in writes {
            self.data.insert(key.clone(), value.clone());
        }
        self.writes += writes.len();
        Ok(())
    }
}

// =============================================================================
// ACCOUNT STATE
// =============================================================================

/// Contract storage and balances keyed by account.
#[derive(Debug, Default)]
pub struct InMemoryAccountState {
    storage: HashMap<(Address, Vec<u8>), Vec<u8>>,
    balances: HashMap<Address, U256>,
    writes: usize,
    journal: Vec<AccountSnapshot>,
}

#[derive(Debug)]
struct AccountSnapshot {
    storage: HashMap<(Address, Vec<u8>), Vec<u8>>,
    balances: HashMap<Address, U256>,
    writes: usize,
}

impl InMemoryAccountState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutating calls accepted so far (storage sets plus balance credits).
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Storage keys held for `address`, sorted.
    pub fn storage_keys(&self, address: Address) -> Vec<Vec<u8>> {
        let mut keys: Vec<_> = self
            .storage
            .keys()
            .filter(|(owner, _)| *owner == address)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl Checkpoint for InMemoryAccountState {
    fn checkpoint(&mut self) -> usize {
        self.journal.push(AccountSnapshot {
            storage: self.storage.clone(),
            balances: self.balances.clone(),
            writes: self.writes,
        });
        self.journal.len() - 1
    }

    fn revert_to_checkpoint(&mut self, id: usize) {
        self.journal.truncate(id + 1);
        if let Some(saved) = self.journal.pop() {
            self.storage = saved.storage;
            self.balances = saved.balances;
            self.writes = saved.writes;
        }
    }
}

impl AccountState for InMemoryAccountState {
    fn set_state(
        &mut self,
        address: Address,
        key: &[u8],
        value: Vec<u8>,
    ) -> Result<(), StateError> {
        self.storage.insert((address, key.to_vec()), value);
        self.writes += 1;
        Ok(())
    }

    fn get_state(&self, address: Address, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.storage.get(&(address, key.to_vec())).cloned())
    }

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError> {
        let balance = self.balances.entry(address).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow)?;
        self.writes += 1;
        Ok(())
    }

    fn balance(&self, address: Address) -> Result<U256, StateError> {
        Ok(self.balances.get(&address).copied().unwrap_or_default())
    }
}

// =============================================================================
// RESTRICTING LEDGER
// =============================================================================

/// Locked balances per account, released once their epoch is reached.
#[derive(Debug, Default)]
pub struct InMemoryRestrictingLedger {
    records: HashMap<Address, Vec<RestrictingPlan>>,
    journal: Vec<HashMap<Address, Vec<RestrictingPlan>>>,
}

impl InMemoryRestrictingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending plans of `account` in release order.
    pub fn plans(&self, account: &Address) -> &[RestrictingPlan] {
        self.records.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum still locked for `account`.
    pub fn locked(&self, account: &Address) -> U256 {
        self.plans(account)
            .iter()
            .fold(U256::zero(), |acc, plan| acc.saturating_add(plan.amount))
    }

    /// Release every plan of `account` due at or before `epoch` into its
    /// balance. Returns the amount released.
    pub fn release_until(
        &mut self,
        account: Address,
        epoch: u64,
        state: &mut dyn AccountState,
    ) -> Result<U256, LedgerError> {
        let Some(plans) = self.records.get_mut(&account) else {
            return Ok(U256::zero());
        };

        let due = plans.iter().take_while(|plan| plan.epoch <= epoch).count();
        let released = plans[..due]
            .iter()
            .try_fold(U256::zero(), |acc, plan| acc.checked_add(plan.amount))
            .ok_or(StateError::BalanceOverflow)?;
        if !released.is_zero() {
            state.add_balance(account, released)?;
        }

        plans.drain(..due);
        if plans.is_empty() {
            self.records.remove(&account);
        }
        Ok(released)
    }
}

impl Checkpoint for InMemoryRestrictingLedger {
    fn checkpoint(&mut self) -> usize {
        self.journal.push(self.records.clone());
        self.journal.len() - 1
    }

    fn revert_to_checkpoint(&mut self, id: usize) {
        self.journal.truncate(id + 1);
        if let Some(records) = self.journal.pop() {
            self.records = records;
        }
    }
}

impl RestrictingLedger for InMemoryRestrictingLedger {
    fn create_restricting_record(
        &mut self,
        account: Address,
        plans: &[RestrictingPlan],
    ) -> Result<(), LedgerError> {
        RestrictingPlan::validate_all(plans)?;
        let record = self.records.entry(account).or_default();
        record.extend_from_slice(plans);
        record.sort_by_key(|plan| plan.epoch);
        Ok(())
    }
}
