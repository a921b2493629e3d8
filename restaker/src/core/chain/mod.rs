pub mod error;
pub mod ethereum;
pub mod interfaces;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

pub use error::{ChainError, ChainResult};
pub use ethereum::EthereumStakingClient;

use crate::types::{LockPosition, VestingStatus};

/// What the submitter needs from a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: B256,
    pub success: bool,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub block_number: Option<u64>,
}

impl ReceiptSummary {
    /// Fee paid for the transaction, in wei.
    pub fn fee(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Access to the staking contract and the node behind it.
///
/// Reads are plain `eth_call`s; writes go through pre-signed raw transactions so that
/// key material never reaches the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StakingChain: Send + Sync {
    /// Address of the contract every call targets.
    fn contract_address(&self) -> Address;

    async fn chain_id(&self) -> ChainResult<u64>;

    async fn gas_price(&self) -> ChainResult<u128>;

    /// Timestamp of the latest block.
    async fn latest_timestamp(&self) -> ChainResult<u64>;

    /// `showPendingReward(account)` on the staking contract.
    async fn pending_reward(&self, account: Address) -> ChainResult<U256>;

    /// `getStake(account)` on the staking contract.
    async fn staked(&self, account: Address) -> ChainResult<U256>;

    /// `locked`, `lockEnd` and `MAXTIME` on the escrow contract.
    async fn lock_position(&self, account: Address) -> ChainResult<LockPosition>;

    /// `currentEpoch` and `userLastClaimedEpoch(account)` on a vesting RewardDistributor.
    async fn vesting_status(&self, distributor: Address, account: Address) -> ChainResult<VestingStatus>;

    async fn transaction_count(&self, account: Address) -> ChainResult<u64>;

    async fn estimate_gas(&self, request: TransactionRequest) -> ChainResult<u64>;

    /// Broadcasts an EIP-2718 encoded transaction and returns its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> ChainResult<B256>;

    async fn transaction_receipt(&self, tx_hash: B256) -> ChainResult<Option<ReceiptSummary>>;
}
