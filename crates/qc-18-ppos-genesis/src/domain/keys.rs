//! # Snapshot Key Layout
//!
//! Byte layout of every key genesis writes. Keys are prefix-namespaced so a
//! prefix scan enumerates one record family.
//!
//! | Key | Layout | Value |
//! |-----|--------|-------|
//! | Candidate | `"Can" ‖ addr` | RLP `Candidate` |
//! | Power | `"Power" ‖ BE32(ver') ‖ BE104(prio) ‖ BE64(block) ‖ BE32(tx)` | node address |
//! | Stake ref count | `"AccStakeRc" ‖ addr` | BE64 count |
//! | Epoch index | `"EpochIndex"` | RLP `[ValArrIndex]` |
//! | Round index | `"RoundIndex"` | RLP `[ValArrIndex; 2]` |
//! | Epoch validators | `"EpochValArr" ‖ BE64(start) ‖ BE64(end)` | RLP `ValidatorQueue` |
//! | Round validators | `"RoundValArr" ‖ BE64(start) ‖ BE64(end)` | RLP `ValidatorQueue` |

use super::GenesisError;
use shared_types::{Address, U256};

pub const CANDIDATE_KEY_PREFIX: &[u8] = b"Can";
pub const POWER_KEY_PREFIX: &[u8] = b"Power";
pub const ACCOUNT_STAKE_RC_PREFIX: &[u8] = b"AccStakeRc";
pub const EPOCH_INDEX_KEY: &[u8] = b"EpochIndex";
pub const ROUND_INDEX_KEY: &[u8] = b"RoundIndex";
pub const EPOCH_VAL_ARR_PREFIX: &[u8] = b"EpochValArr";
pub const ROUND_VAL_ARR_PREFIX: &[u8] = b"RoundValArr";

/// Account-state key (under the staking contract) holding the genesis PPoS hash.
pub const PPOS_HASH_KEY: &[u8] = b"PPOSHASH";

// Account-state keys seeded alongside the staking data.
pub const YEAR_END_BALANCE_PREFIX: &[u8] = b"YearEndBalance";
pub const YEAR_END_CUMULATIVE_ISSUE_PREFIX: &[u8] = b"YearEndCumulativeIssue";
pub const LATEST_EPOCH_KEY: &[u8] = b"LatestEpoch";
pub const ACTIVE_VERSIONS_KEY: &[u8] = b"ActVers";

/// Width of the stake priority field in power keys.
const PRIORITY_LEN: usize = 13;

/// Largest stake a power key can rank: 2^104 - 1.
#[must_use]
pub fn max_rankable_shares() -> U256 {
    (U256::one() << (PRIORITY_LEN * 8)) - U256::one()
}

/// Major.minor part of a packed `major<<16 | minor<<8 | patch` version.
#[must_use]
pub const fn major_minor(program_version: u32) -> u32 {
    (program_version >> 8) << 8
}

#[must_use]
pub fn candidate_key(node_address: &Address) -> Vec<u8> {
    prefixed(CANDIDATE_KEY_PREFIX, node_address.as_bytes())
}

/// Power index key. Ascending byte order is descending rank: newer
/// major.minor first, then more stake, then earlier block, then earlier tx.
pub fn power_key(
    shares: U256,
    staking_block_num: u64,
    staking_tx_index: u32,
    program_version: u32,
) -> Result<Vec<u8>, GenesisError> {
    let max = max_rankable_shares();
    if shares > max {
        return Err(GenesisError::Encode {
            what: "power key",
            reason: format!("shares {shares} exceed 2^104-1"),
        });
    }

    let sort_version = (i32::MAX as u32)
        .checked_sub(major_minor(program_version))
        .ok_or_else(|| GenesisError::Encode {
            what: "power key",
            reason: format!("program version {program_version:#x} exceeds 0x7fffffff"),
        })?;
    let mut priority = [0u8; 32];
    (max - shares).to_big_endian(&mut priority);

    let mut key = Vec::with_capacity(POWER_KEY_PREFIX.len() + 4 + PRIORITY_LEN + 8 + 4);
    key.extend_from_slice(POWER_KEY_PREFIX);
    key.extend_from_slice(&sort_version.to_be_bytes());
    key.extend_from_slice(&priority[32 - PRIORITY_LEN..]);
    key.extend_from_slice(&staking_block_num.to_be_bytes());
    key.extend_from_slice(&staking_tx_index.to_be_bytes());
    Ok(key)
}

#[must_use]
pub fn account_stake_rc_key(account: &Address) -> Vec<u8> {
    prefixed(ACCOUNT_STAKE_RC_PREFIX, account.as_bytes())
}

#[must_use]
pub fn epoch_val_arr_key(start: u64, end: u64) -> Vec<u8> {
    range_key(EPOCH_VAL_ARR_PREFIX, start, end)
}

#[must_use]
pub fn round_val_arr_key(start: u64, end: u64) -> Vec<u8> {
    range_key(ROUND_VAL_ARR_PREFIX, start, end)
}

#[must_use]
pub fn year_end_balance_key(year: u32) -> Vec<u8> {
    prefixed(YEAR_END_BALANCE_PREFIX, &year.to_be_bytes())
}

#[must_use]
pub fn year_end_cumulative_issue_key(year: u32) -> Vec<u8> {
    prefixed(YEAR_END_CUMULATIVE_ISSUE_PREFIX, &year.to_be_bytes())
}

fn prefixed(prefix: &[u8], body: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + body.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(body);
    key
}

fn range_key(prefix: &[u8], start: u64, end: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 16);
    key.extend_from_slice(prefix);
    key.extend_from_slice(&start.to_be_bytes());
    key.extend_from_slice(&end.to_be_bytes());
    key
}
