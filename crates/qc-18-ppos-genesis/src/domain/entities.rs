//! # Staking Domain Entities
//!
//! Records written into the snapshot store at genesis.
//!
//! ## Encoding
//!
//! Every entity is RLP-encoded as a list whose item order is fixed below.
//! The bytes are folded into the PPoS hash, so the order is consensus data:
//! changing it forks the chain at block 0.

use super::LedgerError;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlsPublicKey, NodeId, U256};

// =============================================================================
// CANDIDATE
// =============================================================================

/// Candidate status word. Bit flags; zero means healthy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CandidateStatus(pub u32);

impl CandidateStatus {
    /// Active candidate. Genesis candidates start here without an approval step.
    pub const VALIDED: Self = Self(0);
    pub const INVALIDED: Self = Self(1 << 0);
    pub const LOW_RATIO: Self = Self(1 << 1);
    pub const NOT_ENOUGH: Self = Self(1 << 2);
    pub const DUPLICATE_SIGN: Self = Self(1 << 3);
    pub const LOW_RATIO_DEL: Self = Self(1 << 4);
    pub const WITHDRAWN: Self = Self(1 << 5);

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 & Self::INVALIDED.0 == 0
    }

    #[must_use]
    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl Encodable for CandidateStatus {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append(&self.0);
    }
}

impl Decodable for CandidateStatus {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        rlp.as_val().map(Self)
    }
}

/// Free-form candidate description shown by explorers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub external_id: String,
    pub node_name: String,
    pub website: String,
    pub details: String,
}

impl Encodable for Description {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append(&self.external_id);
        s.append(&self.node_name);
        s.append(&self.website);
        s.append(&self.details);
    }
}

impl Decodable for Description {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, 4)?;
        Ok(Self {
            external_id: rlp.val_at(0)?,
            node_name: rlp.val_at(1)?,
            website: rlp.val_at(2)?,
            details: rlp.val_at(3)?,
        })
    }
}

/// A registered staking entity eligible to become a validator.
///
/// Keyed in the snapshot store by the address derived from `node_id`.
///
/// RLP: `[node_id, bls_pub_key, staking_address, benefit_address,
/// staking_tx_index, program_version, status, staking_epoch,
/// staking_block_num, shares, released, released_hes, restricting_plan,
/// restricting_plan_hes, description]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub node_id: NodeId,
    pub bls_pub_key: BlsPublicKey,
    /// Account that staked the deposit.
    pub staking_address: Address,
    /// Account receiving block and staking rewards.
    pub benefit_address: Address,
    /// Position of the staking transaction within its block. Ranking tie-break.
    pub staking_tx_index: u32,
    /// Major.minor program version (patch byte cleared).
    pub program_version: u32,
    pub status: CandidateStatus,
    pub staking_epoch: u32,
    pub staking_block_num: u64,
    /// Total stake weight (own deposit plus delegations).
    pub shares: U256,
    /// Free-balance deposit in effect.
    pub released: U256,
    /// Free-balance deposit still in its hesitation period.
    pub released_hes: U256,
    /// Locked-balance deposit in effect.
    pub restricting_plan: U256,
    /// Locked-balance deposit still in its hesitation period.
    pub restricting_plan_hes: U256,
    pub description: Description,
}

const CANDIDATE_ITEMS: usize = 15;

impl Encodable for Candidate {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(CANDIDATE_ITEMS);
        s.append(&self.node_id);
        s.append(&self.bls_pub_key);
        s.append(&self.staking_address);
        s.append(&self.benefit_address);
        s.append(&self.staking_tx_index);
        s.append(&self.program_version);
        s.append(&self.status);
        s.append(&self.staking_epoch);
        s.append(&self.staking_block_num);
        s.append(&self.shares);
        s.append(&self.released);
        s.append(&self.released_hes);
        s.append(&self.restricting_plan);
        s.append(&self.restricting_plan_hes);
        s.append(&self.description);
    }
}

impl Decodable for Candidate {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, CANDIDATE_ITEMS)?;
        Ok(Self {
            node_id: rlp.val_at(0)?,
            bls_pub_key: rlp.val_at(1)?,
            staking_address: rlp.val_at(2)?,
            benefit_address: rlp.val_at(3)?,
            staking_tx_index: rlp.val_at(4)?,
            program_version: rlp.val_at(5)?,
            status: rlp.val_at(6)?,
            staking_epoch: rlp.val_at(7)?,
            staking_block_num: rlp.val_at(8)?,
            shares: rlp.val_at(9)?,
            released: rlp.val_at(10)?,
            released_hes: rlp.val_at(11)?,
            restricting_plan: rlp.val_at(12)?,
            restricting_plan_hes: rlp.val_at(13)?,
            description: rlp.val_at(14)?,
        })
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Ranking tuple `[version, shares, block_number, tx_index]`, each rendered
/// as a decimal string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakingWeight(pub [String; 4]);

impl StakingWeight {
    #[must_use]
    pub fn new(program_version: u32, shares: U256, block_number: u64, tx_index: u32) -> Self {
        Self([
            program_version.to_string(),
            shares.to_string(),
            block_number.to_string(),
            tx_index.to_string(),
        ])
    }
}

impl Encodable for StakingWeight {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        for item in &self.0 {
            s.append(item);
        }
    }
}

impl Decodable for StakingWeight {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, 4)?;
        Ok(Self([
            rlp.val_at(0)?,
            rlp.val_at(1)?,
            rlp.val_at(2)?,
            rlp.val_at(3)?,
        ]))
    }
}

/// A committee member for an epoch or round.
///
/// RLP: `[node_address, node_id, bls_pub_key, staking_weight, validator_term]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    pub node_address: Address,
    pub node_id: NodeId,
    pub bls_pub_key: BlsPublicKey,
    pub staking_weight: StakingWeight,
    pub validator_term: u32,
}

impl Encodable for Validator {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        s.append(&self.node_address);
        s.append(&self.node_id);
        s.append(&self.bls_pub_key);
        s.append(&self.staking_weight);
        s.append(&self.validator_term);
    }
}

impl Decodable for Validator {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, 5)?;
        Ok(Self {
            node_address: rlp.val_at(0)?,
            node_id: rlp.val_at(1)?,
            bls_pub_key: rlp.val_at(2)?,
            staking_weight: rlp.val_at(3)?,
            validator_term: rlp.val_at(4)?,
        })
    }
}

/// Validators in selection order. Earlier entries win ties.
pub type ValidatorQueue = Vec<Validator>;

// =============================================================================
// VALIDATOR ARRAY INDEXES
// =============================================================================

/// Block range `[start, end]` over which a validator queue snapshot is
/// authoritative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValArrIndex {
    pub start: u64,
    pub end: u64,
}

impl ValArrIndex {
    /// Previous-round slot at genesis, where no prior round exists.
    pub const PLACEHOLDER: Self = Self { start: 0, end: 0 };

    #[must_use]
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// True for the `{0, 0}` "no prior round" sentinel.
    ///
    /// Round rotation must test this before treating the slot as a real range.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::PLACEHOLDER
    }

    #[must_use]
    pub fn contains(&self, block_number: u64) -> bool {
        !self.is_placeholder() && (self.start..=self.end).contains(&block_number)
    }
}

impl Encodable for ValArrIndex {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.start);
        s.append(&self.end);
    }
}

impl Decodable for ValArrIndex {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, 2)?;
        Ok(Self {
            start: rlp.val_at(0)?,
            end: rlp.val_at(1)?,
        })
    }
}

/// Ordered index ranges: one entry for epochs, `[previous, current]` for rounds.
pub type ValArrIndexQueue = Vec<ValArrIndex>;

// =============================================================================
// RESTRICTING PLAN
// =============================================================================

/// A balance that unlocks once `epoch` is reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestrictingPlan {
    pub epoch: u64,
    pub amount: U256,
}

impl RestrictingPlan {
    /// Check a record before it is accepted by a ledger: non-empty, every
    /// plan releasing a non-zero amount at a non-zero epoch.
    pub fn validate_all(plans: &[RestrictingPlan]) -> Result<(), LedgerError> {
        if plans.is_empty() {
            return Err(LedgerError::EmptyPlans);
        }
        for (index, plan) in plans.iter().enumerate() {
            if plan.epoch == 0 {
                return Err(LedgerError::InvalidPlan {
                    index,
                    reason: "release epoch must be after genesis".to_string(),
                });
            }
            if plan.amount.is_zero() {
                return Err(LedgerError::InvalidPlan {
                    index,
                    reason: "amount must be non-zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Encodable for RestrictingPlan {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.epoch);
        s.append(&self.amount);
    }
}

impl Decodable for RestrictingPlan {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_items(rlp, 2)?;
        Ok(Self {
            epoch: rlp.val_at(0)?,
            amount: rlp.val_at(1)?,
        })
    }
}

// =============================================================================
// GOVERNANCE
// =============================================================================

/// Program version activated at a block. Stored as JSON by governance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveVersionValue {
    pub active_version: u32,
    pub active_block: u64,
}

// =============================================================================
// LIST CODEC
// =============================================================================

/// RLP-encode a slice as a list of its items.
#[must_use]
pub fn encode_list<T: Encodable>(items: &[T]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(items.len());
    for item in items {
        stream.append(item);
    }
    stream.out().to_vec()
}

/// Decode an RLP list of `T`.
pub fn decode_list<T: Decodable>(bytes: &[u8]) -> Result<Vec<T>, DecoderError> {
    let rlp = Rlp::new(bytes);
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    rlp.as_list()
}

fn expect_items(rlp: &Rlp, expected: usize) -> Result<(), DecoderError> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    if rlp.item_count()? != expected {
        return Err(DecoderError::RlpIncorrectListLen);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_validator(tag: u8) -> Validator {
        Validator {
            node_address: Address::new([tag; 20]),
            node_id: NodeId::new([tag; 64]),
            bls_pub_key: BlsPublicKey::new([tag; 96]),
            staking_weight: StakingWeight::new(0x0001_0200, U256::from(1000u64), 0, u32::from(tag)),
            validator_term: 0,
        }
    }

    #[test]
    fn test_status_flags() {
        assert!(CandidateStatus::VALIDED.is_valid());
        assert!(!CandidateStatus::INVALIDED.is_valid());
        let combined = CandidateStatus(CandidateStatus::LOW_RATIO.0 | CandidateStatus::NOT_ENOUGH.0);
        assert!(combined.is_valid());
        assert!(combined.contains(CandidateStatus::NOT_ENOUGH));
        assert!(!combined.contains(CandidateStatus::WITHDRAWN));
    }

    #[test]
    fn test_staking_weight_renders_decimal() {
        let weight = StakingWeight::new(65_792, U256::exp10(24), 0, 3);
        assert_eq!(weight.0[0], "65792");
        assert_eq!(weight.0[1], "1000000000000000000000000");
        assert_eq!(weight.0[2], "0");
        assert_eq!(weight.0[3], "3");
    }

    #[test]
    fn test_validator_queue_preserves_order() {
        let queue = vec![sample_validator(3), sample_validator(1), sample_validator(2)];
        let decoded: ValidatorQueue = decode_list(&encode_list(&queue)).unwrap();
        assert_eq!(decoded, queue);
    }

    #[test]
    fn test_round_index_shape() {
        let round = vec![ValArrIndex::PLACEHOLDER, ValArrIndex::new(1, 250)];
        let decoded: ValArrIndexQueue = decode_list(&encode_list(&round)).unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].is_placeholder());
        assert!(!decoded[1].is_placeholder());
    }

    #[test]
    fn test_placeholder_contains_nothing() {
        assert!(!ValArrIndex::PLACEHOLDER.contains(0));
        assert!(ValArrIndex::new(1, 250).contains(250));
        assert!(!ValArrIndex::new(1, 250).contains(251));
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        let mut s = RlpStream::new_list(1);
        s.append(&1u64);
        assert_eq!(
            rlp::decode::<ValArrIndex>(&s.out()),
            Err(DecoderError::RlpIncorrectListLen)
        );
    }

    #[test]
    fn test_decode_list_rejects_scalar() {
        let encoded = rlp::encode(&7u64);
        assert!(decode_list::<ValArrIndex>(&encoded).is_err());
    }

    #[test]
    fn test_active_version_json_field_names() {
        let json = serde_json::to_string(&vec![ActiveVersionValue {
            active_version: 65_792,
            active_block: 0,
        }])
        .unwrap();
        assert_eq!(json, r#"[{"ActiveVersion":65792,"ActiveBlock":0}]"#);
    }

    #[test]
    fn test_restricting_plan_validation() {
        assert_eq!(
            RestrictingPlan::validate_all(&[]),
            Err(LedgerError::EmptyPlans)
        );
        let zero_epoch = [RestrictingPlan {
            epoch: 0,
            amount: U256::one(),
        }];
        assert!(matches!(
            RestrictingPlan::validate_all(&zero_epoch),
            Err(LedgerError::InvalidPlan { index: 0, .. })
        ));
        let plans = [
            RestrictingPlan {
                epoch: 10,
                amount: U256::one(),
            },
            RestrictingPlan {
                epoch: 20,
                amount: U256::zero(),
            },
        ];
        assert!(matches!(
            RestrictingPlan::validate_all(&plans),
            Err(LedgerError::InvalidPlan { index: 1, .. })
        ));
    }
}
