//! # Genesis Configuration
//!
//! Chain genesis description and the economic model that sizes epochs and
//! rounds.
//!
//! Both are plain structs with sane defaults that can also be loaded from a
//! `genesis.json` (camelCase field names, amounts as `0x` hex, node identities
//! as `0x` hex).

use super::GenesisError;
use serde::{Deserialize, Serialize};
use shared_types::{BlsPublicKey, NodeId, U256};
use std::path::Path;

/// Minutes in one issuance cycle (a year) by default.
const DEFAULT_CYCLE_MINUTES: u64 = 525_960;

/// Validator selection mode of the consensus engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorMode {
    /// Fixed validator set from the config file. No staking data is seeded.
    #[default]
    Static,
    /// Validators elected from an inner contract.
    Inner,
    /// Proof-of-stake election from staking candidates.
    Ppos,
}

/// One configured genesis validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialNode {
    pub node_id: NodeId,
    pub bls_pub_key: BlsPublicKey,
}

/// Consensus engine section of the chain config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbftConfig {
    #[serde(default)]
    pub validator_mode: ValidatorMode,
    /// Candidate validators in priority order. Only the first
    /// `cons_validator_num` are seeded.
    #[serde(default)]
    pub initial_nodes: Vec<InitialNode>,
}

/// Chain parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(default)]
    pub chain_id: u64,
    #[serde(default)]
    pub cbft: Option<CbftConfig>,
}

/// Genesis description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    #[serde(default)]
    pub config: Option<ChainConfig>,
    /// Block number of the genesis block.
    #[serde(default)]
    pub number: u64,
}

impl Genesis {
    /// Parse a `genesis.json` document.
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        serde_json::from_str(json).map_err(|e| GenesisError::InvalidConfig(e.to_string()))
    }

    /// Load and parse a `genesis.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenesisError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GenesisError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Convenience constructor for a PPoS chain.
    #[must_use]
    pub fn ppos(chain_id: u64, initial_nodes: Vec<InitialNode>) -> Self {
        Self {
            config: Some(ChainConfig {
                chain_id,
                cbft: Some(CbftConfig {
                    validator_mode: ValidatorMode::Ppos,
                    initial_nodes,
                }),
            }),
            number: 0,
        }
    }
}

/// Text used for genesis candidate descriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionTemplate {
    /// Node names are `<prefix>.node.<position>`, positions starting at 1.
    pub node_name_prefix: String,
    pub website: String,
    pub details: String,
}

impl Default for DescriptionTemplate {
    fn default() -> Self {
        Self {
            node_name_prefix: "qc".to_string(),
            website: "https://github.com/NerfedChou/Quantum-Chain".to_string(),
            details: "Quantum-Chain Genesis Node".to_string(),
        }
    }
}

impl DescriptionTemplate {
    #[must_use]
    pub fn node_name(&self, position: usize) -> String {
        format!("{}.node.{}", self.node_name_prefix, position)
    }
}

/// Economic and scheduling parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EconomicModel {
    /// Committee size: validators per consensus round.
    pub cons_validator_num: u64,
    /// Blocks each validator produces per round.
    pub per_round_blocks: u64,
    /// Consensus rounds per settlement epoch.
    pub epoch_rounds: u64,
    /// Target block interval in milliseconds.
    pub block_interval_ms: u64,
    /// Length of one issuance cycle (a year) in minutes.
    pub additional_cycle_minutes: u64,
    /// Minimum self-stake of a candidate, in base units.
    pub stake_threshold: U256,
    pub description: DescriptionTemplate,
}

impl Default for EconomicModel {
    fn default() -> Self {
        Self {
            cons_validator_num: 25,
            per_round_blocks: 10,
            epoch_rounds: 88,
            block_interval_ms: 1000,
            additional_cycle_minutes: DEFAULT_CYCLE_MINUTES,
            // 1,000,000 tokens of 10^18 base units
            stake_threshold: U256::exp10(24),
            description: DescriptionTemplate::default(),
        }
    }
}

impl EconomicModel {
    /// Reject parameters that would produce empty or overflowing ranges.
    pub fn validate(&self) -> Result<(), GenesisError> {
        let fields = [
            ("consValidatorNum", self.cons_validator_num),
            ("perRoundBlocks", self.per_round_blocks),
            ("epochRounds", self.epoch_rounds),
            ("blockIntervalMs", self.block_interval_ms),
            ("additionalCycleMinutes", self.additional_cycle_minutes),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(GenesisError::InvalidConfig(format!("{name} must be non-zero")));
        }
        if self.cons_validator_num > u64::from(u32::MAX) {
            return Err(GenesisError::InvalidConfig(
                "consValidatorNum exceeds the staking tx index range".to_string(),
            ));
        }
        self.per_round_blocks
            .checked_mul(self.cons_validator_num)
            .and_then(|size| size.checked_mul(self.epoch_rounds))
            .ok_or_else(|| GenesisError::InvalidConfig("epoch length overflows".to_string()))?;
        self.additional_cycle_minutes
            .checked_mul(60_000)
            .ok_or_else(|| GenesisError::InvalidConfig("cycle length overflows".to_string()))?;
        if self.epochs_per_year() == 0 {
            return Err(GenesisError::InvalidConfig(
                "an epoch is longer than one issuance cycle".to_string(),
            ));
        }
        if self.stake_threshold.is_zero() {
            return Err(GenesisError::InvalidConfig(
                "stakeThreshold must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Blocks in one consensus round.
    #[must_use]
    pub fn consensus_size(&self) -> u64 {
        self.per_round_blocks.saturating_mul(self.cons_validator_num)
    }

    /// Blocks in one settlement epoch.
    #[must_use]
    pub fn blocks_each_epoch(&self) -> u64 {
        self.consensus_size().saturating_mul(self.epoch_rounds)
    }

    /// Settlement epochs in one issuance cycle.
    #[must_use]
    pub fn epochs_per_year(&self) -> u64 {
        let blocks_per_year =
            self.additional_cycle_minutes.saturating_mul(60_000) / self.block_interval_ms.max(1);
        blocks_per_year / self.blocks_each_epoch().max(1)
    }
}
