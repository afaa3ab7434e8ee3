//! # Staging Overlays
//!
//! Buffer writes in front of a read-only view of a real collaborator. Genesis
//! builds against these overlays and commits only after every step has
//! succeeded, so a failed build never leaves partial state behind.

use crate::domain::{LedgerError, RestrictingPlan, StateError, StoreError};
use crate::ports::{AccountState, Checkpoint, RestrictingLedger, SnapshotStore};
use shared_types::{Address, U256};
use std::collections::HashMap;

/// Snapshot writes buffered in call order.
pub struct StagedSnapshot<'a> {
    base: &'a dyn SnapshotStore,
    overlay: HashMap<Vec<u8>, Vec<u8>>,
    writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl<'a> StagedSnapshot<'a> {
    pub fn new(base: &'a dyn SnapshotStore) -> Self {
        Self {
            base,
            overlay: HashMap::new(),
            writes: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Buffered writes in the order they were made.
    pub fn into_writes(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.writes
    }
}

impl SnapshotStore for StagedSnapshot<'_> {
    fn put_base(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.overlay.insert(key.to_vec(), value.to_vec());
        self.writes.push((key.to_vec(), value.to_vec()));
        Ok(())
    }

    fn get_base(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.overlay.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get_base(key),
        }
    }

    fn put_base_batch(&mut self, writes: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError> {
        for (key, value) in writes {
            self.put_base(key, value)?;
        }
        Ok(())
    }
}

/// A buffered account-state mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountOp {
    SetState {
        address: Address,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    AddBalance {
        address: Address,
        amount: U256,
    },
}

/// Account-state mutations buffered in call order.
pub struct StagedAccountState<'a> {
    base: &'a dyn AccountState,
    storage: HashMap<(Address, Vec<u8>), Vec<u8>>,
    credits: HashMap<Address, U256>,
    ops: Vec<AccountOp>,
    checkpoints: Vec<StagedMark>,
}

type StagedMark = (HashMap<(Address, Vec<u8>), Vec<u8>>, HashMap<Address, U256>, usize);

impl<'a> StagedAccountState<'a> {
    pub fn new(base: &'a dyn AccountState) -> Self {
        Self {
            base,
            storage: HashMap::new(),
            credits: HashMap::new(),
            ops: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    pub fn into_ops(self) -> Vec<AccountOp> {
        self.ops
    }
}

impl Checkpoint for StagedAccountState<'_> {
    fn checkpoint(&mut self) -> usize {
        self.checkpoints
            .push((self.storage.clone(), self.credits.clone(), self.ops.len()));
        self.checkpoints.len() - 1
    }

    fn revert_to_checkpoint(&mut self, id: usize) {
        self.checkpoints.truncate(id + 1);
        if let Some((storage, credits, ops)) = self.checkpoints.pop() {
            self.storage = storage;
            self.credits = credits;
            self.ops.truncate(ops);
        }
    }
}

impl AccountState for StagedAccountState<'_> {
    fn set_state(
        &mut self,
        address: Address,
        key: &[u8],
        value: Vec<u8>,
    ) -> Result<(), StateError> {
        self.storage.insert((address, key.to_vec()), value.clone());
        self.ops.push(AccountOp::SetState {
            address,
            key: key.to_vec(),
            value,
        });
        Ok(())
    }

    fn get_state(&self, address: Address, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        match self.storage.get(&(address, key.to_vec())) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get_state(address, key),
        }
    }

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError> {
        let pending = self.credits.get(&address).copied().unwrap_or_default();
        let credited = pending
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow)?;
        // Surface overflow now rather than at commit.
        self.base
            .balance(address)?
            .checked_add(credited)
            .ok_or(StateError::BalanceOverflow)?;
        self.credits.insert(address, credited);
        self.ops.push(AccountOp::AddBalance { address, amount });
        Ok(())
    }

    fn balance(&self, address: Address) -> Result<U256, StateError> {
        let pending = self.credits.get(&address).copied().unwrap_or_default();
        self.base
            .balance(address)?
            .checked_add(pending)
            .ok_or(StateError::BalanceOverflow)
    }
}

/// Restricting records buffered in call order. Plans are validated on entry.
#[derive(Debug, Default)]
pub struct StagedLedger {
    records: Vec<(Address, Vec<RestrictingPlan>)>,
    checkpoints: Vec<usize>,
}

impl StagedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_records(self) -> Vec<(Address, Vec<RestrictingPlan>)> {
        self.records
    }
}

impl Checkpoint for StagedLedger {
    fn checkpoint(&mut self) -> usize {
        self.checkpoints.push(self.records.len());
        self.checkpoints.len() - 1
    }

    fn revert_to_checkpoint(&mut self, id: usize) {
        self.checkpoints.truncate(id + 1);
        if let Some(len) = self.checkpoints.pop() {
            self.records.truncate(len);
        }
    }
}

impl RestrictingLedger for StagedLedger {
    fn create_restricting_record(
        &mut self,
        account: Address,
        plans: &[RestrictingPlan],
    ) -> Result<(), LedgerError> {
        RestrictingPlan::validate_all(plans)?;
        self.records.push((account, plans.to_vec()));
        Ok(())
    }
}

/// Replay buffered account ops onto `target`.
pub fn apply_account_ops(
    target: &mut dyn AccountState,
    ops: Vec<AccountOp>,
) -> Result<(), StateError> {
    for op in ops {
        match op {
            AccountOp::SetState {
                address,
                key,
                value,
            } => target.set_state(address, &key, value)?,
            AccountOp::AddBalance { address, amount } => target.add_balance(address, amount)?,
        }
    }
    Ok(())
}

/// Replay buffered restricting records onto `target`.
pub fn apply_ledger_records(
    target: &mut dyn RestrictingLedger,
    records: Vec<(Address, Vec<RestrictingPlan>)>,
) -> Result<(), LedgerError> {
    for (account, plans) in records {
        target.create_restricting_record(account, &plans)?;
    }
    Ok(())
}
