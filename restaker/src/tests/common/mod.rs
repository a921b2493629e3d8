pub mod constants;

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use chrono::Utc;
use rstest::*;

use crate::agent::{Agent, GasSettings};
use crate::core::chain::{ChainError, MockStakingChain, ReceiptSummary, StakingChain};
use crate::core::history::{HistoryError, HistorySink};
use crate::core::notify::Notifier;
use crate::core::signer::{CredentialError, SignerProvider};
use crate::types::units::parse_token;
use crate::types::{LockPosition, Mode, Policy, RunResult, StakeSnapshot, VestingStatus};
use constants::*;

pub fn tokens(value: &str) -> U256 {
    parse_token(value).unwrap()
}

pub fn gwei(value: u64) -> u128 {
    u128::from(value) * 1_000_000_000
}

/// Hash the scripted chain hands out for the n-th broadcast (1-based).
pub fn step_hash(n: u8) -> B256 {
    B256::repeat_byte(n)
}

/// Fee of one scripted receipt.
pub fn receipt_fee() -> U256 {
    U256::from(RECEIPT_GAS_USED) * U256::from(gwei(RECEIPT_GAS_PRICE_GWEI))
}

/// Signer backed by a fixed test key. Counts how often the key was handed out.
pub struct StaticKeyProvider {
    signer: PrivateKeySigner,
    pub loads: AtomicUsize,
}

impl StaticKeyProvider {
    pub fn new() -> Self {
        Self { signer: PrivateKeySigner::from_str(ANVIL_KEY).unwrap(), loads: AtomicUsize::new(0) }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl SignerProvider for StaticKeyProvider {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn load_signer(&self) -> Result<PrivateKeySigner, CredentialError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.signer.clone())
    }
}

/// History kept in memory, optionally refusing every write.
#[derive(Default)]
pub struct MemoryHistory {
    rows: Mutex<Vec<RunResult>>,
    fail: bool,
}

impl MemoryHistory {
    pub fn failing() -> Self {
        Self { rows: Mutex::new(Vec::new()), fail: true }
    }

    pub fn rows(&self) -> Vec<RunResult> {
        self.rows.lock().unwrap().clone()
    }
}

impl HistorySink for MemoryHistory {
    fn append(&self, result: &RunResult) -> Result<(), HistoryError> {
        if self.fail {
            return Err(HistoryError::Io {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.rows.lock().unwrap().push(result.clone());
        Ok(())
    }
}

/// What happens to each broadcast step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepScript {
    Confirm,
    Revert,
    /// The node refuses the raw transaction.
    Reject,
    /// Accepted, but no receipt ever shows up.
    NeverMined,
}

/// Node behaviour for one test.
#[derive(Debug, Clone)]
pub struct ChainScript {
    pub chain_id: u64,
    /// Successive `eth_gasPrice` answers. The last one repeats.
    pub gas_prices: Vec<u128>,
    pub pending_reward: U256,
    pub lock: LockPosition,
    pub timestamp: u64,
    /// `None` makes `eth_estimateGas` fail.
    pub estimate: Option<u64>,
    /// `None` makes the nonce lookup fail with a connection error.
    pub nonce: Option<u64>,
    pub steps: Vec<StepScript>,
    /// `None` makes the vesting distributor read fail.
    pub vesting: Option<VestingStatus>,
}

impl Default for ChainScript {
    fn default() -> Self {
        Self {
            chain_id: TEST_CHAIN_ID,
            gas_prices: vec![gwei(30)],
            pending_reward: tokens("5.0"),
            lock: LockPosition { amount: tokens("1000"), end: NOW + 30 * 86_400, max_time: MAX_TIME },
            timestamp: NOW,
            estimate: Some(100_000),
            nonce: Some(7),
            steps: vec![StepScript::Confirm, StepScript::Confirm],
            vesting: Some(VestingStatus { current_epoch: 12, last_claimed_epoch: 12 }),
        }
    }
}

/// Raw transactions the scripted node accepted, in order.
pub type Broadcasts = Arc<Mutex<Vec<Bytes>>>;

pub fn scripted_chain(script: ChainScript) -> (Arc<dyn StakingChain>, Broadcasts) {
    let mut chain = MockStakingChain::new();
    let broadcasts: Broadcasts = Arc::new(Mutex::new(Vec::new()));

    chain.expect_contract_address().return_const(Address::from_str(CONTRACT_ADDRESS).unwrap());
    let chain_id = script.chain_id;
    chain.expect_chain_id().returning(move || Ok(chain_id));

    let prices = script.gas_prices.clone();
    let price_calls = AtomicUsize::new(0);
    chain.expect_gas_price().returning(move || {
        let i = price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(prices[i.min(prices.len() - 1)])
    });

    let timestamp = script.timestamp;
    chain.expect_latest_timestamp().returning(move || Ok(timestamp));
    let reward = script.pending_reward;
    chain.expect_pending_reward().returning(move |_| Ok(reward));
    chain.expect_staked().returning(|_| Ok(tokens("100")));
    let lock = script.lock;
    chain.expect_lock_position().returning(move |_| Ok(lock));
    let vesting = script.vesting;
    chain
        .expect_vesting_status()
        .returning(move |_, _| vesting.ok_or_else(|| ChainError::Read("execution reverted".to_string())));

    let nonce = script.nonce;
    chain
        .expect_transaction_count()
        .returning(move |_| nonce.ok_or_else(|| ChainError::Connection("connection refused".to_string())));
    let estimate = script.estimate;
    chain
        .expect_estimate_gas()
        .returning(move |_| estimate.ok_or_else(|| ChainError::Read("execution reverted".to_string())));

    let steps = script.steps.clone();
    let sent = broadcasts.clone();
    chain.expect_send_raw_transaction().returning(move |raw| {
        let mut sent = sent.lock().unwrap();
        match steps.get(sent.len()) {
            Some(StepScript::Reject) => Err(ChainError::Submission("replacement transaction underpriced".to_string())),
            _ => {
                sent.push(raw);
                Ok(step_hash(sent.len() as u8))
            }
        }
    });

    let steps = script.steps;
    chain.expect_transaction_receipt().returning(move |tx_hash| {
        let ordinal = usize::from(tx_hash.0[0]);
        let receipt = |success| ReceiptSummary {
            tx_hash,
            success,
            gas_used: RECEIPT_GAS_USED,
            effective_gas_price: gwei(RECEIPT_GAS_PRICE_GWEI),
            block_number: Some(100 + ordinal as u64),
        };
        match steps.get(ordinal.wrapping_sub(1)) {
            Some(StepScript::Confirm) => Ok(Some(receipt(true))),
            Some(StepScript::Revert) => Ok(Some(receipt(false))),
            _ => Ok(None),
        }
    });

    (Arc::new(chain), broadcasts)
}

pub fn decode(raw: &Bytes) -> TxEnvelope {
    TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap()
}

pub fn agent_with(
    chain: Arc<dyn StakingChain>,
    signer: Arc<dyn SignerProvider>,
    history: Arc<dyn HistorySink>,
    notifiers: Vec<Arc<dyn Notifier>>,
) -> Agent {
    Agent::new(chain, signer, history, notifiers, TEST_CHAIN_ID, GasSettings::default())
}

pub fn vesting_distributor() -> Address {
    Address::from_str(VESTING_DISTRIBUTOR).unwrap()
}

#[fixture]
pub fn restake_policy() -> Policy {
    Policy {
        mode: Mode::Restake,
        min_reward_threshold: tokens("1.0"),
        max_gas_price: gwei(50),
        target_lock_days: None,
    }
}

#[fixture]
pub fn lock_policy() -> Policy {
    Policy { mode: Mode::LockExtend, min_reward_threshold: U256::ZERO, max_gas_price: gwei(50), target_lock_days: None }
}

pub fn restake_snapshot(pending_reward: &str, gas_price_gwei: u64) -> StakeSnapshot {
    StakeSnapshot {
        pending_reward: tokens(pending_reward),
        staked: tokens("100"),
        lock: None,
        gas_price: gwei(gas_price_gwei),
        observed_at: NOW,
    }
}

pub fn lock_snapshot(lock: Option<LockPosition>, gas_price_gwei: u64) -> StakeSnapshot {
    StakeSnapshot {
        pending_reward: U256::ZERO,
        staked: U256::ZERO,
        lock,
        gas_price: gwei(gas_price_gwei),
        observed_at: NOW,
    }
}

pub fn sample_result(status: crate::types::RunStatus) -> RunResult {
    RunResult::skipped(Utc::now(), Mode::Restake, status)
}
