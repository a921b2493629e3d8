//! The gate between observation and action. Pure: no I/O, no clock.

use alloy::primitives::U256;

use crate::types::constant::{DAY_SECS, WEEK_SECS};
use crate::types::{LockPosition, Mode, Policy, RunStatus, StakeSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Submit the mode's sequence.
    Act {
        /// Reward to compound, or amount whose lock gets extended.
        amount: U256,
        /// New lock expiry. Lock mode only.
        unlock_time: Option<u64>,
    },
    /// Do nothing this pass. Always one of the `Skipped*` statuses.
    Skip(RunStatus),
}

/// Lock expiry the policy aims for, rounded down to a week boundary like the escrow does.
pub fn target_unlock_time(lock: &LockPosition, observed_at: u64, target_lock_days: Option<u64>) -> u64 {
    let horizon = match target_lock_days {
        Some(days) => days.saturating_mul(DAY_SECS).min(lock.max_time),
        None => lock.max_time,
    };
    (observed_at.saturating_add(horizon) / WEEK_SECS) * WEEK_SECS
}

/// First matching rule wins: gas cap, reward threshold, lock presence, lock target.
pub fn decide(snapshot: &StakeSnapshot, policy: &Policy) -> Decision {
    if snapshot.gas_price > policy.max_gas_price {
        return Decision::Skip(RunStatus::SkippedGasCap);
    }

    match policy.mode {
        Mode::Restake => {
            if snapshot.pending_reward < policy.min_reward_threshold {
                return Decision::Skip(RunStatus::SkippedBelowThreshold);
            }
            Decision::Act { amount: snapshot.pending_reward, unlock_time: None }
        }
        Mode::LockExtend => {
            let lock = match &snapshot.lock {
                Some(lock) if !lock.amount.is_zero() => lock,
                _ => return Decision::Skip(RunStatus::SkippedNoLock),
            };
            let target = target_unlock_time(lock, snapshot.observed_at, policy.target_lock_days);
            if lock.end >= target {
                return Decision::Skip(RunStatus::SkippedAlreadyMax);
            }
            Decision::Act { amount: lock.amount, unlock_time: Some(target) }
        }
    }
}
