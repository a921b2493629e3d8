use std::sync::Arc;
use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use chrono::{DateTime, Utc};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::core::chain::interfaces::{StakingContract, VotingEscrow};
use crate::core::chain::{ChainResult, ReceiptSummary, StakingChain};
use crate::core::signer::SignerProvider;
use crate::types::constant::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_GAS_LIMIT_MULTIPLIER, DEFAULT_RECEIPT_POLL_INTERVAL_SECS,
    GAS_LIMIT_BUFFER,
};
use crate::types::units::format_gwei;
use crate::types::{FailureKind, Mode, RunResult, RunStatus, StepEstimate, StepFailure, TxStep};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSettings {
    /// Applied to every gas estimate before [`GAS_LIMIT_BUFFER`] is added.
    pub limit_multiplier: f64,
    pub confirmation_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            limit_multiplier: DEFAULT_GAS_LIMIT_MULTIPLIER,
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
            receipt_poll_interval: Duration::from_secs(DEFAULT_RECEIPT_POLL_INTERVAL_SECS),
        }
    }
}

impl GasSettings {
    pub fn gas_limit(&self, estimate: u64) -> u64 {
        ((estimate as f64 * self.limit_multiplier).ceil() as u64).saturating_add(GAS_LIMIT_BUFFER)
    }
}

/// What the gate approved, with the gas figures observed at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub mode: Mode,
    pub amount: U256,
    pub unlock_time: Option<u64>,
    pub gas_price: u128,
    pub max_gas_price: u128,
}

/// Signs, broadcasts and confirms a mode's sequence, one step at a time.
pub struct Submitter {
    chain: Arc<dyn StakingChain>,
    signer: Arc<dyn SignerProvider>,
    chain_id: u64,
    gas: GasSettings,
}

impl Submitter {
    pub fn new(chain: Arc<dyn StakingChain>, signer: Arc<dyn SignerProvider>, chain_id: u64, gas: GasSettings) -> Self {
        Self { chain, signer, chain_id, gas }
    }

    fn calldata(&self, step: &TxStep, plan: &Plan) -> Option<Bytes> {
        let data = match step.function_name {
            "createStake" => StakingContract::createStakeCall {}.abi_encode(),
            "addRewardToStake" => StakingContract::addRewardToStakeCall { user: self.signer.address() }.abi_encode(),
            "increaseUnlockTime" => {
                VotingEscrow::increaseUnlockTimeCall { newUnlockTime: U256::from(plan.unlock_time?) }.abi_encode()
            }
            _ => return None,
        };
        Some(data.into())
    }

    fn base_request(&self, input: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.signer.address())
            .with_to(self.chain.contract_address())
            .with_input(input)
            .with_value(U256::ZERO)
    }

    /// `eth_estimateGas` with the compiled estimate as fallback.
    async fn estimate(&self, step: &TxStep, request: &TransactionRequest, gas_price: u128) -> StepEstimate {
        let estimate = match self.chain.estimate_gas(request.clone()).await {
            Ok(gas) => gas,
            Err(e) => {
                warn!(
                    step = step.ordinal,
                    function = step.function_name,
                    fallback = step.gas_limit_estimate,
                    error = %e,
                    "Gas estimation failed, using compiled estimate"
                );
                step.gas_limit_estimate
            }
        };
        let gas_limit = self.gas.gas_limit(estimate);
        StepEstimate {
            ordinal: step.ordinal,
            function_name: step.function_name.to_string(),
            gas_limit,
            max_cost: U256::from(gas_limit) * U256::from(gas_price),
        }
    }

    /// Produces the raw signed transaction. The signer lives only inside this call.
    async fn sign(&self, request: TransactionRequest) -> Result<Bytes, String> {
        let signer = self.signer.load_signer().map_err(|e| e.to_string())?;
        let wallet = EthereumWallet::from(signer);
        let envelope = request.build(&wallet).await.map_err(|e| e.to_string())?;
        drop(wallet);
        Ok(envelope.encoded_2718().into())
    }

    /// Polls for a receipt until one shows up or the confirmation timeout elapses.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Option<ReceiptSummary> {
        let poll = async {
            loop {
                match self.chain.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => debug!(tx_hash = %tx_hash, "Receipt not available yet"),
                    Err(e) => warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, still waiting"),
                }
                sleep(self.gas.receipt_poll_interval).await;
            }
        };
        timeout(self.gas.confirmation_timeout, poll).await.ok()
    }

    /// Runs `plan` to completion or to the first failing step.
    ///
    /// Errors only when nothing could be broadcast because a read failed before step 1.
    pub async fn submit(&self, plan: &Plan, dry_run: bool, timestamp: DateTime<Utc>) -> ChainResult<RunResult> {
        let mut result = RunResult {
            timestamp,
            mode: plan.mode,
            status: RunStatus::Success,
            amount: plan.amount,
            gas_cost: U256::ZERO,
            tx_hashes: Vec::new(),
            estimates: Vec::new(),
            failure: None,
        };

        if dry_run {
            for step in plan.mode.steps() {
                let Some(input) = self.calldata(step, plan) else {
                    return Ok(self.fail(result, step.ordinal, FailureKind::Signing, None, "no calldata for step"));
                };
                let estimate = self.estimate(step, &self.base_request(input), plan.gas_price).await;
                info!(
                    log_type = "dry_run",
                    category = "submit",
                    step = step.ordinal,
                    function = step.function_name,
                    gas_limit = estimate.gas_limit,
                    max_cost_wei = %estimate.max_cost,
                    "Would send {}.",
                    step.description
                );
                result.estimates.push(estimate);
            }
            result.status = RunStatus::DryRun;
            return Ok(result);
        }

        let wallet = self.signer.address();
        let first_nonce = self.chain.transaction_count(wallet).await?;
        let mut gas_price = plan.gas_price;

        for (offset, step) in plan.mode.steps().iter().enumerate() {
            if offset > 0 {
                gas_price = match self.chain.gas_price().await {
                    Ok(price) if price > plan.max_gas_price => {
                        let message = format!(
                            "gas price rose to {} gwei, cap is {} gwei",
                            format_gwei(price),
                            format_gwei(plan.max_gas_price)
                        );
                        return Ok(self.fail(result, step.ordinal, FailureKind::GasCapExceeded, None, &message));
                    }
                    Ok(price) => price,
                    Err(e) => {
                        let message = format!("could not re-read gas price: {e}");
                        return Ok(self.fail(result, step.ordinal, FailureKind::Submission, None, &message));
                    }
                };
            }

            let Some(input) = self.calldata(step, plan) else {
                return Ok(self.fail(result, step.ordinal, FailureKind::Signing, None, "no calldata for step"));
            };
            let request = self.base_request(input);
            let estimate = self.estimate(step, &request, gas_price).await;
            let request = request
                .with_chain_id(self.chain_id)
                .with_nonce(first_nonce + offset as u64)
                .with_gas_limit(estimate.gas_limit)
                .with_gas_price(gas_price);
            result.estimates.push(estimate);

            info!(
                log_type = "starting",
                category = "submit",
                step = step.ordinal,
                function = step.function_name,
                nonce = first_nonce + offset as u64,
                gas_price_gwei = %format_gwei(gas_price),
                "Submitting step."
            );

            let raw = match self.sign(request).await {
                Ok(raw) => raw,
                Err(message) => return Ok(self.fail(result, step.ordinal, FailureKind::Signing, None, &message)),
            };

            let tx_hash = match self.chain.send_raw_transaction(raw).await {
                Ok(hash) => hash,
                Err(e) => {
                    return Ok(self.fail(result, step.ordinal, FailureKind::Submission, None, &e.to_string()));
                }
            };
            info!(log_type = "pending", category = "submit", step = step.ordinal, tx_hash = %tx_hash, "Step broadcast.");

            let Some(receipt) = self.wait_for_receipt(tx_hash).await else {
                let message = format!("no receipt after {}s", self.gas.confirmation_timeout.as_secs());
                return Ok(self.fail(result, step.ordinal, FailureKind::ConfirmationTimeout, Some(tx_hash), &message));
            };

            result.gas_cost += receipt.fee();
            if !receipt.success {
                let message = format!("reverted in block {:?}", receipt.block_number);
                return Ok(self.fail(result, step.ordinal, FailureKind::Reverted, Some(tx_hash), &message));
            }

            info!(
                log_type = "completed",
                category = "submit",
                step = step.ordinal,
                tx_hash = %tx_hash,
                gas_used = receipt.gas_used,
                "✅ Step confirmed."
            );
            result.tx_hashes.push(tx_hash);
        }

        Ok(result)
    }

    fn fail(
        &self,
        mut result: RunResult,
        ordinal: u8,
        kind: FailureKind,
        tx_hash: Option<B256>,
        message: &str,
    ) -> RunResult {
        error!(
            log_type = "failed",
            category = "submit",
            step = ordinal,
            kind = %kind,
            tx_hash = ?tx_hash,
            confirmed_steps = result.tx_hashes.len(),
            "❌ Step failed: {message}"
        );
        result.status = RunStatus::Failed;
        result.amount = U256::ZERO;
        result.failure = Some(StepFailure { ordinal, kind, tx_hash, message: message.to_string() });
        result
    }
}

