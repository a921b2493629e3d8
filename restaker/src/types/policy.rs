use alloy::primitives::U256;

use crate::types::Mode;

/// Thresholds the gate applies to a snapshot. Immutable for the duration of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub mode: Mode,
    /// Minimum pending reward (wei) worth compounding.
    pub min_reward_threshold: U256,
    /// Gas price ceiling (wei) above which nothing is submitted.
    pub max_gas_price: u128,
    /// Desired remaining lock duration. `None` extends to the escrow's `MAXTIME`.
    pub target_lock_days: Option<u64>,
}
