//! # Genesis Allowance
//!
//! Reward-pool funding seeded at genesis: one tranche credited immediately and
//! eight yearly tranches locked in the restricting ledger.

use crate::domain::{GenesisError, RestrictingPlan};
use crate::ports::{AccountState, RestrictingLedger};
use shared_types::{REWARD_MANAGER_POOL, U256};
use tracing::info;

/// Immediate tranche as `(mantissa, decimal exponent)`.
const IMMEDIATE_TRANCHE: (u64, usize) = (622_157_424_869_165, 11);

/// Locked tranches for years 1..=8.
const YEARLY_TRANCHES: [(u64, usize); 8] = [
    (559_657_424_869_165, 11),
    (495_594_924_869_165, 11),
    (429_930_862_369_165, 11),
    (362_625_198_306_666, 11),
    (293_636_892_642_603, 11),
    (222_923_879_336_939, 11),
    (150_443_040_698_633, 11),
    (761_501_810_943_699, 10),
];

fn tranche((mantissa, exponent): (u64, usize)) -> U256 {
    U256::from(mantissa) * U256::exp10(exponent)
}

/// Amounts and release epochs of the genesis allowance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowanceSchedule {
    /// Credited to the reward pool at genesis.
    pub immediate: U256,
    /// Released to the reward pool at the end of years 1..=8.
    pub plans: Vec<RestrictingPlan>,
}

impl AllowanceSchedule {
    /// Sum of the immediate tranche and every plan.
    #[must_use]
    pub fn total(&self) -> U256 {
        self.plans
            .iter()
            .fold(self.immediate, |acc, plan| acc + plan.amount)
    }
}

/// Computes and applies the genesis allowance.
#[derive(Clone, Copy, Debug)]
pub struct GenesisAllowanceScheduler {
    epochs_per_year: u64,
}

impl GenesisAllowanceScheduler {
    #[must_use]
    pub fn new(epochs_per_year: u64) -> Self {
        Self { epochs_per_year }
    }

    /// Plan k unlocks at epoch `k * epochs_per_year`.
    #[must_use]
    pub fn schedule(&self) -> AllowanceSchedule {
        let plans = YEARLY_TRANCHES
            .iter()
            .zip(1u64..)
            .map(|(amount, year)| RestrictingPlan {
                epoch: year.saturating_mul(self.epochs_per_year),
                amount: tranche(*amount),
            })
            .collect();
        AllowanceSchedule {
            immediate: tranche(IMMEDIATE_TRANCHE),
            plans,
        }
    }

    /// Credit the immediate tranche and record the locked plans.
    ///
    /// `genesis_issue` only appears in the log line; tranche amounts are fixed.
    pub fn apply(
        &self,
        state: &mut dyn AccountState,
        ledger: &mut dyn RestrictingLedger,
        genesis_issue: U256,
    ) -> Result<AllowanceSchedule, GenesisError> {
        let schedule = self.schedule();
        state.add_balance(REWARD_MANAGER_POOL, schedule.immediate)?;
        ledger.create_restricting_record(REWARD_MANAGER_POOL, &schedule.plans)?;
        info!(
            issue = %genesis_issue,
            immediate = %schedule.immediate,
            plans = schedule.plans.len(),
            "[qc-18] Seeded genesis allowance for reward pool"
        );
        Ok(schedule)
    }
}
