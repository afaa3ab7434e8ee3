//! # Well-Known Accounts
//!
//! System contract addresses live in the reserved `0x1000…00NN` range.
//! Genesis seeds state under several of them; the dispatcher is mounted at
//! the staking and governance addresses.

use crate::entities::Address;

const fn system_address(last: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0x10;
    bytes[19] = last;
    Address::new(bytes)
}

/// Staking contract. Holds the genesis PPoS hash.
pub const STAKING_CONTRACT: Address = system_address(0x02);

/// Reward manager pool. Benefit address of every genesis candidate and
/// recipient of the allowance schedule.
pub const REWARD_MANAGER_POOL: Address = system_address(0x03);

/// Governance contract.
pub const GOVERNANCE_CONTRACT: Address = system_address(0x05);

/// Foundation account that stakes every genesis candidate.
pub const GENESIS_FOUNDATION: Address = Address::new([
    0x49, 0x33, 0x01, 0x71, 0x26, 0x71, 0xad, 0xa5, 0x06, 0xba, 0x6c, 0xa7, 0x89, 0x1f, 0x43,
    0x6d, 0x29, 0x18, 0x58, 0x21,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_addresses() {
        assert_eq!(
            hex::encode(STAKING_CONTRACT.as_bytes()),
            "1000000000000000000000000000000000000002"
        );
        assert_eq!(REWARD_MANAGER_POOL.as_bytes()[19], 0x03);
        assert_eq!(GOVERNANCE_CONTRACT.as_bytes()[19], 0x05);
    }
}
