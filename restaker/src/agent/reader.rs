use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::core::chain::{ChainError, ChainResult, StakingChain};
use crate::types::units::{format_gwei, format_token};
use crate::types::{Mode, StakeSnapshot, VestingStatus};

/// Fetches the values the gate decides on. Read-only, never retries.
pub struct ChainReader {
    chain: Arc<dyn StakingChain>,
    account: Address,
    expected_chain_id: u64,
}

impl ChainReader {
    pub fn new(chain: Arc<dyn StakingChain>, account: Address, expected_chain_id: u64) -> Self {
        Self { chain, account, expected_chain_id }
    }

    pub async fn snapshot(&self, mode: Mode) -> ChainResult<StakeSnapshot> {
        let actual = self.chain.chain_id().await?;
        if actual != self.expected_chain_id {
            return Err(ChainError::WrongChain { expected: self.expected_chain_id, actual });
        }

        let gas_price = self.chain.gas_price().await?;
        let observed_at = self.chain.latest_timestamp().await?;

        let snapshot = match mode {
            Mode::Restake => StakeSnapshot {
                pending_reward: self.chain.pending_reward(self.account).await?,
                staked: self.chain.staked(self.account).await?,
                lock: None,
                gas_price,
                observed_at,
            },
            Mode::LockExtend => StakeSnapshot {
                pending_reward: U256::ZERO,
                staked: U256::ZERO,
                lock: Some(self.chain.lock_position(self.account).await?),
                gas_price,
                observed_at,
            },
        };

        info!(
            log_type = "completed",
            category = "read",
            %mode,
            pending_reward = %format_token(snapshot.pending_reward),
            staked = %format_token(snapshot.staked),
            gas_price_gwei = %format_gwei(snapshot.gas_price),
            "Snapshot taken."
        );
        if let Some(lock) = &snapshot.lock {
            debug!(locked = %format_token(lock.amount), lock_end = lock.end, max_time = lock.max_time, "Lock position read");
        }
        Ok(snapshot)
    }

    /// Epoch progress of the wallet on the vesting distributor.
    pub async fn vesting(&self, distributor: Address) -> ChainResult<VestingStatus> {
        let status = self.chain.vesting_status(distributor, self.account).await?;
        debug!(
            category = "read",
            current_epoch = status.current_epoch,
            last_claimed_epoch = status.last_claimed_epoch,
            "Vesting epochs read"
        );
        Ok(status)
    }
}
