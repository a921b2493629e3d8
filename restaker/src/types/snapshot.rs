use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// VotingEscrow lock of the wallet, as read from the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPosition {
    /// Locked amount in wei.
    pub amount: U256,
    /// Unix timestamp (seconds) at which the lock expires.
    pub end: u64,
    /// `MAXTIME` of the escrow, in seconds.
    pub max_time: u64,
}

/// On-chain state observed at the start of a pass. Re-fetched every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeSnapshot {
    /// Rewards accrued but not yet moved into the stake, in wei.
    pub pending_reward: U256,
    /// Currently staked amount, in wei. Zero in lock mode.
    pub staked: U256,
    /// Present only in lock mode.
    pub lock: Option<LockPosition>,
    /// Network gas price in wei.
    pub gas_price: u128,
    /// Timestamp of the latest block when the snapshot was taken.
    pub observed_at: u64,
}

/// Claim progress of the wallet on the vesting RewardDistributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingStatus {
    pub current_epoch: u64,
    pub last_claimed_epoch: u64,
}

impl VestingStatus {
    /// Epochs released since the last claim.
    pub fn epochs_behind(&self) -> u64 {
        self.current_epoch.saturating_sub(self.last_claimed_epoch)
    }
}
