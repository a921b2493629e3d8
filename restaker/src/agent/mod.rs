//! One maintenance pass: read, gate, submit, record, notify.

pub mod policy;
pub mod reader;
pub mod submitter;

use std::sync::Arc;

use alloy::primitives::Address;
use chrono::Utc;
use tracing::{error, info, warn, Instrument};

pub use policy::{decide, target_unlock_time, Decision};
pub use reader::ChainReader;
pub use submitter::{GasSettings, Plan, Submitter};

use crate::core::chain::StakingChain;
use crate::core::history::HistorySink;
use crate::core::notify::Notifier;
use crate::core::signer::SignerProvider;
use crate::error::{AgentError, AgentResult};
use crate::types::units::format_token;
use crate::types::{Mode, Policy, RunResult, StakeSnapshot, VestingStatus};

/// Wiring of the pipeline for a single wallet.
pub struct Agent {
    reader: ChainReader,
    submitter: Submitter,
    history: Arc<dyn HistorySink>,
    notifiers: Vec<Arc<dyn Notifier>>,
    vesting_distributor: Option<Address>,
    run_guard: tokio::sync::Mutex<()>,
}

impl Agent {
    pub fn new(
        chain: Arc<dyn StakingChain>,
        signer: Arc<dyn SignerProvider>,
        history: Arc<dyn HistorySink>,
        notifiers: Vec<Arc<dyn Notifier>>,
        chain_id: u64,
        gas: GasSettings,
    ) -> Self {
        let reader = ChainReader::new(chain.clone(), signer.address(), chain_id);
        let submitter = Submitter::new(chain, signer, chain_id, gas);
        Self {
            reader,
            submitter,
            history,
            notifiers,
            vesting_distributor: None,
            run_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Checks `distributor` for unclaimed vesting epochs after every restake pass.
    pub fn with_vesting_distributor(mut self, distributor: Address) -> Self {
        self.vesting_distributor = Some(distributor);
        self
    }

    /// Vesting claim progress, when a distributor is configured.
    pub async fn vesting(&self) -> AgentResult<Option<VestingStatus>> {
        let Some(distributor) = self.vesting_distributor else {
            return Ok(None);
        };
        Ok(Some(self.reader.vesting(distributor).await?))
    }

    /// Snapshot and decision without acting on it.
    pub async fn inspect(&self, policy: &Policy) -> AgentResult<(StakeSnapshot, Decision)> {
        let snapshot = self.reader.snapshot(policy.mode).await?;
        let decision = decide(&snapshot, policy);
        Ok((snapshot, decision))
    }

    /// Runs one pass with `policy`.
    ///
    /// Connection and read failures abort without a history row. Every other outcome,
    /// failed submissions included, is appended to the history exactly once.
    pub async fn run_once(&self, policy: &Policy, dry_run: bool) -> AgentResult<RunResult> {
        let _guard = self.run_guard.try_lock().map_err(|_| AgentError::AlreadyRunning)?;
        let span = tracing::info_span!("pass", mode = %policy.mode, dry_run);
        self.pass(policy, dry_run).instrument(span).await
    }

    async fn pass(&self, policy: &Policy, dry_run: bool) -> AgentResult<RunResult> {
        let timestamp = Utc::now();
        let snapshot = self.reader.snapshot(policy.mode).await?;

        let result = match decide(&snapshot, policy) {
            Decision::Skip(status) => {
                info!(log_type = "completed", category = "gate", %status, "Nothing to do this pass.");
                RunResult::skipped(timestamp, policy.mode, status)
            }
            Decision::Act { amount, unlock_time } => {
                info!(
                    log_type = "completed",
                    category = "gate",
                    amount = %format_token(amount),
                    unlock_time = ?unlock_time,
                    "Gate approved the sequence."
                );
                let plan = Plan {
                    mode: policy.mode,
                    amount,
                    unlock_time,
                    gas_price: snapshot.gas_price,
                    max_gas_price: policy.max_gas_price,
                };
                self.submitter.submit(&plan, dry_run, timestamp).await?
            }
        };

        if let Err(e) = self.history.append(&result) {
            error!(
                log_type = "failed",
                category = "history",
                status = %result.status,
                amount = %format_token(result.amount),
                gas_cost = %format_token(result.gas_cost),
                tx_hashes = ?result.tx_hashes,
                error = %e,
                "Could not record pass outcome."
            );
            return Err(e.into());
        }

        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(&result).await {
                warn!(category = "notify", error = %e, "Notifier failed");
            }
        }

        if policy.mode == Mode::Restake {
            self.check_vesting().await;
        }

        Ok(result)
    }

    /// Reminds the notifiers when vesting epochs wait to be claimed. Never fails the pass.
    async fn check_vesting(&self) {
        let status = match self.vesting().await {
            Ok(Some(status)) => status,
            Ok(None) => return,
            Err(e) => {
                warn!(category = "read", error = %e, "Vesting check failed");
                return;
            }
        };
        if status.epochs_behind() == 0 {
            return;
        }

        info!(category = "notify", epochs_behind = status.epochs_behind(), "New vesting rewards available");
        for notifier in &self.notifiers {
            if let Err(e) = notifier.vesting_available(&status).await {
                warn!(category = "notify", error = %e, "Notifier failed");
            }
        }
    }
}
