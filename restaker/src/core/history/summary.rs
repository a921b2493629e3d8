use alloy::primitives::U256;

use super::HistoryRow;
use crate::types::{Mode, RunStatus};

/// Aggregate view over the history file of one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    pub mode: Mode,
    pub total_runs: usize,
    pub successes: usize,
    pub failures: usize,
    pub skipped: usize,
    pub dry_runs: usize,
    /// Reward moved into the stake by successful restakes. Lock extensions move nothing
    /// and never add to it.
    pub total_amount: U256,
    /// Fees paid across all runs, failed ones included.
    pub total_gas_cost: U256,
    /// Most recent rows, oldest first.
    pub recent: Vec<HistoryRow>,
}

impl HistorySummary {
    pub fn from_rows(mode: Mode, rows: &[HistoryRow], recent_limit: usize) -> Self {
        let mut summary = Self {
            mode,
            total_runs: rows.len(),
            successes: 0,
            failures: 0,
            skipped: 0,
            dry_runs: 0,
            total_amount: U256::ZERO,
            total_gas_cost: U256::ZERO,
            recent: Vec::new(),
        };

        for row in rows {
            match row.status {
                RunStatus::Success => {
                    summary.successes += 1;
                    if mode == Mode::Restake {
                        summary.total_amount += row.amount;
                    }
                }
                RunStatus::Failed => summary.failures += 1,
                RunStatus::DryRun => summary.dry_runs += 1,
                RunStatus::SkippedBelowThreshold
                | RunStatus::SkippedGasCap
                | RunStatus::SkippedAlreadyMax
                | RunStatus::SkippedNoLock => summary.skipped += 1,
            }
            summary.total_gas_cost += row.gas_cost;
        }

        summary.recent = rows[rows.len().saturating_sub(recent_limit)..].to_vec();
        summary
    }

    /// Compounded reward minus fees, saturating at zero. `None` for lock extensions,
    /// which only spend gas.
    pub fn net_gain(&self) -> Option<U256> {
        match self.mode {
            Mode::Restake => Some(self.total_amount.saturating_sub(self.total_gas_cost)),
            Mode::LockExtend => None,
        }
    }
}
