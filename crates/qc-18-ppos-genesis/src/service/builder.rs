//! # Genesis State Builder
//!
//! Seeds the staking ledger for the first epoch and records the PPoS hash.
//!
//! ## Write Order
//!
//! The PPoS hash folds snapshot writes in call order, so this sequence is
//! consensus data:
//!
//! ```text
//! for each initial node i < min(C, nodes):
//!     Can ‖ addr                 → Candidate
//!     Power ‖ …                  → node address
//! AccStakeRc ‖ foundation        → BE64(count)
//! EpochIndex                     → [{1, blocks_each_epoch}]
//! EpochValArr ‖ 1 ‖ E            → validator queue
//! RoundIndex                     → [{0,0}, {1, consensus_size}]
//! RoundValArr ‖ 0 ‖ 0            → validator queue
//! RoundValArr ‖ 1 ‖ R            → validator queue
//! ```
//!
//! Plugin state (reward pool, governance, allowance) and the final hash go to
//! account state and are not folded.
//!
//! ## Atomicity
//!
//! Everything is staged first, so a failure while staging leaves every
//! collaborator untouched. The commit checkpoints account state and the
//! ledger, replays into both, and flushes the snapshot batch last. Store
//! batches are all-or-nothing; if any commit step fails, both checkpoints are
//! reverted and the error is returned.

use crate::adapters::staged::{apply_account_ops, apply_ledger_records};
use crate::adapters::{AccountOp, StagedAccountState, StagedLedger, StagedSnapshot};
use crate::domain::keys;
use crate::domain::{
    encode_list, ActiveVersionValue, Candidate, CandidateStatus, Description, EconomicModel,
    Genesis, GenesisError, InitialNode, RestrictingPlan, StakingWeight, StoreError,
    ValArrIndex, ValArrIndexQueue, ValidatorMode, Validator, ValidatorQueue,
};
use crate::ports::{AccountState, AddressDeriver, Checkpoint, RestrictingLedger, SnapshotStore};
use crate::service::allowance::GenesisAllowanceScheduler;
use crate::service::hash_chain::HashChainedStore;
use shared_types::{
    u256_to_min_be_bytes, Address, Hash, GENESIS_FOUNDATION, GOVERNANCE_CONTRACT,
    REWARD_MANAGER_POOL, STAKING_CONTRACT, U256,
};
use std::fmt;
use tracing::{info, warn};

/// Inputs supplied by the node at startup rather than by `genesis.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenesisParams {
    /// Packed `major<<16 | minor<<8 | patch` version of the running binary.
    pub program_version: u32,
    /// Reward pool balance at the end of year 0.
    pub genesis_reward: U256,
    /// Cumulative issuance at the end of year 0.
    pub genesis_issue: U256,
}

/// Why a build wrote nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingChainConfig,
    MissingConsensusConfig,
    NoInitialNodes,
    NotPposMode(ValidatorMode),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingChainConfig => write!(f, "genesis chain config is absent"),
            Self::MissingConsensusConfig => write!(f, "cbft config is absent"),
            Self::NoInitialNodes => write!(f, "no initial nodes configured"),
            Self::NotPposMode(mode) => write!(f, "validator mode is {mode:?}, not ppos"),
        }
    }
}

/// What a successful build seeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisSummary {
    pub ppos_hash: Hash,
    pub candidate_count: usize,
    /// Queue stored for the first epoch and both rounds.
    pub validators: ValidatorQueue,
    pub epoch_index: ValArrIndexQueue,
    pub round_index: ValArrIndexQueue,
    /// Snapshot writes folded into `ppos_hash`.
    pub snapshot_writes: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenesisOutcome {
    Skipped(SkipReason),
    Built(GenesisSummary),
}

impl GenesisOutcome {
    #[must_use]
    pub fn summary(&self) -> Option<&GenesisSummary> {
        match self {
            Self::Built(summary) => Some(summary),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Builds PPoS genesis state.
pub struct GenesisStateBuilder<'a> {
    genesis: &'a Genesis,
    economics: &'a EconomicModel,
    params: GenesisParams,
    deriver: &'a dyn AddressDeriver,
}

impl<'a> GenesisStateBuilder<'a> {
    pub fn new(
        genesis: &'a Genesis,
        economics: &'a EconomicModel,
        params: GenesisParams,
        deriver: &'a dyn AddressDeriver,
    ) -> Self {
        Self {
            genesis,
            economics,
            params,
            deriver,
        }
    }

    /// Seed staking data, plugin state and the PPoS hash.
    ///
    /// Returns `Skipped` without touching any collaborator when the genesis
    /// does not describe a PPoS chain with initial nodes.
    pub fn build(
        &self,
        snapshot: &mut dyn SnapshotStore,
        state: &mut dyn AccountState,
        ledger: &mut dyn RestrictingLedger,
    ) -> Result<GenesisOutcome, GenesisError> {
        let nodes = match self.initial_nodes() {
            Ok(nodes) => nodes,
            Err(reason) => {
                match reason {
                    SkipReason::MissingChainConfig | SkipReason::MissingConsensusConfig => {
                        warn!("[qc-18] Not storing PPoS genesis state: {}", reason)
                    }
                    _ => info!("[qc-18] Not storing PPoS genesis state: {}", reason),
                }
                return Ok(GenesisOutcome::Skipped(reason));
            }
        };
        self.economics.validate()?;

        let (summary, writes, ops, records) = {
            let mut staged_snapshot = StagedSnapshot::new(&*snapshot);
            let mut staged_state = StagedAccountState::new(&*state);
            let mut staged_ledger = StagedLedger::new();

            let summary = self.stage_staking_data(nodes, &mut staged_snapshot)?;
            self.stage_plugin_state(&mut staged_state, &mut staged_ledger)?;
            staged_state.set_state(
                STAKING_CONTRACT,
                keys::PPOS_HASH_KEY,
                summary.ppos_hash.to_vec(),
            )?;

            (
                summary,
                staged_snapshot.into_writes(),
                staged_state.into_ops(),
                staged_ledger.into_records(),
            )
        };

        let state_mark = state.checkpoint();
        let ledger_mark = ledger.checkpoint();
        if let Err(err) = commit(snapshot, state, ledger, writes, ops, records) {
            ledger.revert_to_checkpoint(ledger_mark);
            state.revert_to_checkpoint(state_mark);
            warn!(error = %err, "[qc-18] Genesis commit failed, reverted staged state");
            return Err(err);
        }

        info!(
            pposhash = %hex::encode(summary.ppos_hash),
            count = summary.candidate_count,
            "[qc-18] Stored PPoS genesis state"
        );
        Ok(GenesisOutcome::Built(summary))
    }

    fn initial_nodes(&self) -> Result<&'a [InitialNode], SkipReason> {
        let genesis: &'a Genesis = self.genesis;
        let config = genesis
            .config
            .as_ref()
            .ok_or(SkipReason::MissingChainConfig)?;
        let cbft = config
            .cbft
            .as_ref()
            .ok_or(SkipReason::MissingConsensusConfig)?;
        if cbft.initial_nodes.is_empty() {
            return Err(SkipReason::NoInitialNodes);
        }
        if cbft.validator_mode != ValidatorMode::Ppos {
            return Err(SkipReason::NotPposMode(cbft.validator_mode));
        }
        Ok(&cbft.initial_nodes)
    }

    fn stage_staking_data(
        &self,
        nodes: &[InitialNode],
        snapshot: &mut dyn SnapshotStore,
    ) -> Result<GenesisSummary, GenesisError> {
        let version = keys::major_minor(self.params.program_version);
        let threshold = self.economics.stake_threshold;
        let limit = usize::try_from(self.economics.cons_validator_num)
            .unwrap_or(usize::MAX)
            .min(nodes.len());

        let mut chained = HashChainedStore::new(snapshot);
        let mut validators: ValidatorQueue = Vec::with_capacity(limit);

        for (index, node) in nodes.iter().take(limit).enumerate() {
            let node_address = self.deriver.node_address(&node.node_id).map_err(|source| {
                GenesisError::IdentityDerivation {
                    index,
                    node_id: node.node_id.to_hex(),
                    source,
                }
            })?;
            let tx_index = u32::try_from(index + 1).map_err(|_| {
                GenesisError::InvalidConfig(format!("initial node #{index} exceeds tx index range"))
            })?;

            let candidate = Candidate {
                node_id: node.node_id,
                bls_pub_key: node.bls_pub_key,
                staking_address: GENESIS_FOUNDATION,
                benefit_address: REWARD_MANAGER_POOL,
                staking_tx_index: tx_index,
                program_version: version,
                status: CandidateStatus::VALIDED,
                staking_epoch: 0,
                staking_block_num: 0,
                shares: threshold,
                released: threshold,
                released_hes: U256::zero(),
                restricting_plan: U256::zero(),
                restricting_plan_hes: U256::zero(),
                description: Description {
                    external_id: String::new(),
                    node_name: self.economics.description.node_name(index + 1),
                    website: self.economics.description.website.clone(),
                    details: self.economics.description.details.clone(),
                },
            };

            put(
                &mut chained,
                "candidate",
                &keys::candidate_key(&node_address),
                &rlp::encode(&candidate),
            )?;
            put(
                &mut chained,
                "power index",
                &keys::power_key(threshold, 0, tx_index, version)?,
                node_address.as_bytes(),
            )?;

            validators.push(Validator {
                node_address,
                node_id: node.node_id,
                bls_pub_key: node.bls_pub_key,
                staking_weight: StakingWeight::new(version, threshold, 0, tx_index),
                validator_term: 0,
            });
        }

        put(
            &mut chained,
            "stake reference count",
            &keys::account_stake_rc_key(&GENESIS_FOUNDATION),
            &(limit as u64).to_be_bytes(),
        )?;

        let epoch_end = self.economics.blocks_each_epoch();
        let epoch_index = vec![ValArrIndex::new(1, epoch_end)];
        let queue = encode_list(&validators);
        put(
            &mut chained,
            "epoch index",
            keys::EPOCH_INDEX_KEY,
            &encode_list(&epoch_index),
        )?;
        put(
            &mut chained,
            "epoch validators",
            &keys::epoch_val_arr_key(1, epoch_end),
            &queue,
        )?;

        let round_end = self.economics.consensus_size();
        let round_index = vec![ValArrIndex::PLACEHOLDER, ValArrIndex::new(1, round_end)];
        put(
            &mut chained,
            "round index",
            keys::ROUND_INDEX_KEY,
            &encode_list(&round_index),
        )?;
        put(
            &mut chained,
            "previous round validators",
            &keys::round_val_arr_key(0, 0),
            &queue,
        )?;
        put(
            &mut chained,
            "current round validators",
            &keys::round_val_arr_key(1, round_end),
            &queue,
        )?;

        let snapshot_writes = chained.writes();
        Ok(GenesisSummary {
            ppos_hash: chained.finish(),
            candidate_count: limit,
            validators,
            epoch_index,
            round_index,
            snapshot_writes,
        })
    }

    fn stage_plugin_state(
        &self,
        state: &mut dyn AccountState,
        ledger: &mut dyn RestrictingLedger,
    ) -> Result<(), GenesisError> {
        state.set_state(
            REWARD_MANAGER_POOL,
            &keys::year_end_balance_key(0),
            u256_to_min_be_bytes(self.params.genesis_reward),
        )?;
        state.set_state(
            REWARD_MANAGER_POOL,
            &keys::year_end_cumulative_issue_key(0),
            u256_to_min_be_bytes(self.params.genesis_issue),
        )?;

        let active_versions = vec![ActiveVersionValue {
            active_version: self.params.program_version,
            active_block: 0,
        }];
        let active_versions =
            serde_json::to_vec(&active_versions).map_err(|e| GenesisError::Encode {
                what: "active versions",
                reason: e.to_string(),
            })?;
        info!(
            version = self.params.program_version,
            "[qc-18] Storing genesis active version for governance"
        );
        state.set_state(GOVERNANCE_CONTRACT, keys::ACTIVE_VERSIONS_KEY, active_versions)?;

        GenesisAllowanceScheduler::new(self.economics.epochs_per_year()).apply(
            state,
            ledger,
            self.params.genesis_issue,
        )?;

        state.set_state(
            REWARD_MANAGER_POOL,
            keys::LATEST_EPOCH_KEY,
            0u64.to_be_bytes().to_vec(),
        )?;
        Ok(())
    }
}

fn commit(
    snapshot: &mut dyn SnapshotStore,
    state: &mut dyn AccountState,
    ledger: &mut dyn RestrictingLedger,
    writes: Vec<(Vec<u8>, Vec<u8>)>,
    ops: Vec<AccountOp>,
    records: Vec<(Address, Vec<RestrictingPlan>)>,
) -> Result<(), GenesisError> {
    apply_ledger_records(ledger, records)?;
    apply_account_ops(state, ops)?;
    // Last: the only step the checkpoints cannot undo.
    snapshot
        .put_base_batch(&writes)
        .map_err(|source| GenesisError::Store {
            what: "genesis batch",
            source,
        })
}

fn put<S: SnapshotStore + ?Sized>(
    chained: &mut HashChainedStore<'_, S>,
    what: &'static str,
    key: &[u8],
    value: &[u8],
) -> Result<(), GenesisError> {
    chained
        .put(key, value)
        .map(|_| ())
        .map_err(|source: StoreError| GenesisError::Store { what, source })
}
