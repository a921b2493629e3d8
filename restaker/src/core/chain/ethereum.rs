use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use super::interfaces::{RewardDistributor, StakingContract, VotingEscrow};
use super::{ChainError, ChainResult, ReceiptSummary, StakingChain};
use crate::types::{LockPosition, VestingStatus};

#[derive(Clone, Debug)]
pub struct EthereumStakingValidatedArgs {
    pub rpc_url: Url,
    pub contract_address: Address,
}

/// JSON-RPC backed [`StakingChain`]. Holds no wallet: transactions arrive pre-signed.
pub struct EthereumStakingClient {
    provider: DynProvider,
    contract_address: Address,
}

impl EthereumStakingClient {
    pub fn new_with_args(args: &EthereumStakingValidatedArgs) -> Self {
        // provider without wallet
        let provider = ProviderBuilder::new().connect_http(args.rpc_url.clone()).erased();
        info!(rpc_url = %args.rpc_url, contract = %args.contract_address, "Staking client created");
        Self { provider, contract_address: args.contract_address }
    }
}

fn u256_to_u64(value: U256, what: &str) -> ChainResult<u64> {
    u64::try_from(value).map_err(|_| ChainError::Read(format!("{what} does not fit in u64: {value}")))
}

#[async_trait]
impl StakingChain for EthereumStakingClient {
    fn contract_address(&self) -> Address {
        self.contract_address
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        self.provider.get_chain_id().await.map_err(ChainError::from_read)
    }

    async fn gas_price(&self) -> ChainResult<u128> {
        self.provider.get_gas_price().await.map_err(ChainError::from_read)
    }

    async fn latest_timestamp(&self) -> ChainResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(ChainError::from_read)?
            .ok_or_else(|| ChainError::Read("node returned no latest block".to_string()))?;
        Ok(block.header.timestamp)
    }

    async fn pending_reward(&self, account: Address) -> ChainResult<U256> {
        let contract = StakingContract::new(self.contract_address, self.provider.clone());
        contract.showPendingReward(account).call().await.map_err(ChainError::from_contract)
    }

    async fn staked(&self, account: Address) -> ChainResult<U256> {
        let contract = StakingContract::new(self.contract_address, self.provider.clone());
        contract.getStake(account).call().await.map_err(ChainError::from_contract)
    }

    async fn lock_position(&self, account: Address) -> ChainResult<LockPosition> {
        let escrow = VotingEscrow::new(self.contract_address, self.provider.clone());
        let amount = escrow.locked(account).call().await.map_err(ChainError::from_contract)?;
        let end = escrow.lockEnd(account).call().await.map_err(ChainError::from_contract)?;
        let max_time = escrow.MAXTIME().call().await.map_err(ChainError::from_contract)?;
        Ok(LockPosition { amount, end: u256_to_u64(end, "lockEnd")?, max_time: u256_to_u64(max_time, "MAXTIME")? })
    }

    async fn vesting_status(&self, distributor: Address, account: Address) -> ChainResult<VestingStatus> {
        let vesting = RewardDistributor::new(distributor, self.provider.clone());
        let current = vesting.currentEpoch().call().await.map_err(ChainError::from_contract)?;
        let last_claimed = vesting.userLastClaimedEpoch(account).call().await.map_err(ChainError::from_contract)?;
        Ok(VestingStatus {
            current_epoch: u256_to_u64(current, "currentEpoch")?,
            last_claimed_epoch: u256_to_u64(last_claimed, "userLastClaimedEpoch")?,
        })
    }

    async fn transaction_count(&self, account: Address) -> ChainResult<u64> {
        self.provider.get_transaction_count(account).pending().await.map_err(ChainError::from_read)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> ChainResult<u64> {
        self.provider.estimate_gas(request).await.map_err(ChainError::from_read)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> ChainResult<B256> {
        let pending = self.provider.send_raw_transaction(&raw).await.map_err(ChainError::from_submission)?;
        debug!(tx_hash = %pending.tx_hash(), "Raw transaction accepted by node");
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> ChainResult<Option<ReceiptSummary>> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await.map_err(ChainError::from_read)?;
        Ok(receipt.map(|receipt| ReceiptSummary {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            block_number: receipt.block_number,
        }))
    }
}
