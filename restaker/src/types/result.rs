use alloy::primitives::{B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::types::Mode;

/// Terminal outcome of one pass. Closed set, every consumer matches it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    SkippedBelowThreshold,
    SkippedGasCap,
    SkippedAlreadyMax,
    SkippedNoLock,
    DryRun,
    Failed,
}

impl RunStatus {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            RunStatus::SkippedBelowThreshold
                | RunStatus::SkippedGasCap
                | RunStatus::SkippedAlreadyMax
                | RunStatus::SkippedNoLock
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The signer could not be loaded or refused to sign.
    Signing,
    /// The node rejected the broadcast. No hash exists for the step.
    Submission,
    /// Broadcast, but no receipt within the confirmation timeout.
    ConfirmationTimeout,
    /// Mined with a failed status.
    Reverted,
    /// Network gas price rose above the cap between steps.
    GasCapExceeded,
}

/// Why a sequence stopped, and at which step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub ordinal: u8,
    pub kind: FailureKind,
    /// Hash of the failing step when it was broadcast.
    pub tx_hash: Option<B256>,
    pub message: String,
}

/// Gas figures of a step, as estimated before anything is broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEstimate {
    pub ordinal: u8,
    pub function_name: String,
    pub gas_limit: u64,
    /// `gas_limit * gas_price`, in wei.
    pub max_cost: U256,
}

/// Record of one invocation. Built once, never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    pub status: RunStatus,
    /// Reward compounded (restake) or amount whose lock was extended, in wei.
    /// Dry runs carry the amount that was targeted. Failed passes record zero.
    pub amount: U256,
    /// Fees actually paid, in wei. Zero unless something was mined.
    pub gas_cost: U256,
    /// Hashes of the steps that confirmed, in step order.
    pub tx_hashes: Vec<B256>,
    /// Per-step estimates. Filled on dry runs and before real submissions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub estimates: Vec<StepEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
}

impl RunResult {
    /// A pass that decided not to act.
    pub fn skipped(timestamp: DateTime<Utc>, mode: Mode, status: RunStatus) -> Self {
        Self {
            timestamp,
            mode,
            status,
            amount: U256::ZERO,
            gas_cost: U256::ZERO,
            tx_hashes: Vec::new(),
            estimates: Vec::new(),
            failure: None,
        }
    }

    /// Step 1 confirmed but a later step did not.
    pub fn is_partial(&self) -> bool {
        self.status == RunStatus::Failed && !self.tx_hashes.is_empty()
    }

    /// Broadcast hashes by step position, including an unconfirmed hash of the failing step.
    pub fn hashes_by_ordinal(&self) -> [Option<B256>; 2] {
        let mut slots = [None, None];
        for (slot, hash) in slots.iter_mut().zip(self.tx_hashes.iter()) {
            *slot = Some(*hash);
        }
        if let Some(StepFailure { ordinal, tx_hash: Some(hash), .. }) = &self.failure {
            if let Some(slot) = slots.get_mut(usize::from(*ordinal).saturating_sub(1)) {
                slot.get_or_insert(*hash);
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_its_column_name() {
        assert_eq!(RunStatus::SkippedGasCap.to_string(), "SKIPPED_GAS_CAP");
        assert_eq!(RunStatus::from_str("DRY_RUN").unwrap(), RunStatus::DryRun);
    }

    #[test]
    fn unconfirmed_step_two_hash_lands_in_second_slot() {
        let h1 = B256::repeat_byte(1);
        let h2 = B256::repeat_byte(2);
        let mut result = RunResult::skipped(Utc::now(), Mode::Restake, RunStatus::Failed);
        result.tx_hashes = vec![h1];
        result.failure = Some(StepFailure {
            ordinal: 2,
            kind: FailureKind::ConfirmationTimeout,
            tx_hash: Some(h2),
            message: "timed out".into(),
        });

        assert!(result.is_partial());
        assert_eq!(result.hashes_by_ordinal(), [Some(h1), Some(h2)]);
    }
}
