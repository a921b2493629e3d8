pub mod webhook;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

pub use webhook::WebhookNotifier;

use crate::types::units::format_token;
use crate::types::{RunResult, RunStatus, VestingStatus};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook answered with status {0}")]
    Status(u16),
}

/// Receives every finished pass. Formatting is the sink's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, result: &RunResult) -> Result<(), NotifyError>;

    /// Vesting epochs are waiting to be claimed.
    async fn vesting_available(&self, status: &VestingStatus) -> Result<(), NotifyError>;
}

/// Reports results through the log only.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, result: &RunResult) -> Result<(), NotifyError> {
        let amount = format_token(result.amount);
        let gas_cost = format_token(result.gas_cost);
        match result.status {
            RunStatus::Success => {
                info!(mode = %result.mode, %amount, %gas_cost, tx_count = result.tx_hashes.len(), "✅ Maintenance pass succeeded")
            }
            RunStatus::DryRun => info!(mode = %result.mode, %amount, "Dry run finished, nothing was sent"),
            RunStatus::Failed => error!(
                mode = %result.mode,
                failure = ?result.failure,
                partial = result.is_partial(),
                "❌ Maintenance pass failed"
            ),
            RunStatus::SkippedBelowThreshold
            | RunStatus::SkippedGasCap
            | RunStatus::SkippedAlreadyMax
            | RunStatus::SkippedNoLock => warn!(mode = %result.mode, status = %result.status, "⏭ Pass skipped"),
        }
        Ok(())
    }

    async fn vesting_available(&self, status: &VestingStatus) -> Result<(), NotifyError> {
        info!(
            epochs_behind = status.epochs_behind(),
            current_epoch = status.current_epoch,
            "🎁 Vesting rewards available to claim"
        );
        Ok(())
    }
}
