use rstest::*;

use crate::agent::{decide, target_unlock_time, Decision};
use crate::tests::common::constants::{MAX_TIME, NOW};
use crate::tests::common::{lock_policy, lock_snapshot, restake_policy, restake_snapshot, tokens};
use crate::types::constant::WEEK_SECS;
use crate::types::{LockPosition, Policy, RunStatus};

#[rstest]
#[case("0.0")]
#[case("0.3")]
#[case("5.0")]
#[case("1000000")]
fn gas_above_cap_skips_whatever_the_reward(restake_policy: Policy, #[case] reward: &str) {
    assert_eq!(decide(&restake_snapshot(reward, 80), &restake_policy), Decision::Skip(RunStatus::SkippedGasCap));
}

#[rstest]
#[case("0.0", 30)]
#[case("0.3", 30)]
#[case("0.999999999999999999", 50)]
fn reward_below_threshold_skips(restake_policy: Policy, #[case] reward: &str, #[case] gas: u64) {
    assert_eq!(
        decide(&restake_snapshot(reward, gas), &restake_policy),
        Decision::Skip(RunStatus::SkippedBelowThreshold)
    );
}

#[rstest]
fn gas_exactly_at_cap_and_reward_at_threshold_act(restake_policy: Policy) {
    assert_eq!(
        decide(&restake_snapshot("1.0", 50), &restake_policy),
        Decision::Act { amount: tokens("1.0"), unlock_time: None }
    );
}

#[rstest]
fn reward_above_threshold_acts_on_the_full_reward(restake_policy: Policy) {
    assert_eq!(
        decide(&restake_snapshot("5.0", 30), &restake_policy),
        Decision::Act { amount: tokens("5.0"), unlock_time: None }
    );
}

#[rstest]
fn decide_is_deterministic(restake_policy: Policy, lock_policy: Policy) {
    let snapshot = restake_snapshot("5.0", 30);
    let first = decide(&snapshot, &restake_policy);
    for _ in 0..10 {
        assert_eq!(decide(&snapshot, &restake_policy), first);
    }

    let lock = Some(LockPosition { amount: tokens("10"), end: NOW, max_time: MAX_TIME });
    let snapshot = lock_snapshot(lock, 30);
    assert_eq!(decide(&snapshot, &lock_policy), decide(&snapshot.clone(), &lock_policy.clone()));
}

#[rstest]
fn lock_mode_ignores_reward_threshold(mut lock_policy: Policy) {
    lock_policy.min_reward_threshold = tokens("1000000");
    let lock = Some(LockPosition { amount: tokens("10"), end: NOW + 86_400, max_time: MAX_TIME });
    let expected_target = (NOW + MAX_TIME) / WEEK_SECS * WEEK_SECS;

    assert_eq!(
        decide(&lock_snapshot(lock, 30), &lock_policy),
        Decision::Act { amount: tokens("10"), unlock_time: Some(expected_target) }
    );
}

#[rstest]
#[case(None)]
#[case(Some(LockPosition { amount: alloy::primitives::U256::ZERO, end: NOW + 86_400, max_time: MAX_TIME }))]
fn lock_mode_without_lock_skips(lock_policy: Policy, #[case] lock: Option<LockPosition>) {
    assert_eq!(decide(&lock_snapshot(lock, 30), &lock_policy), Decision::Skip(RunStatus::SkippedNoLock));
}

#[rstest]
fn lock_mode_gas_cap_wins_over_missing_lock(lock_policy: Policy) {
    assert_eq!(decide(&lock_snapshot(None, 80), &lock_policy), Decision::Skip(RunStatus::SkippedGasCap));
}

#[rstest]
fn lock_already_at_target_skips(lock_policy: Policy) {
    let target = (NOW + MAX_TIME) / WEEK_SECS * WEEK_SECS;
    for end in [target, target + WEEK_SECS] {
        let lock = Some(LockPosition { amount: tokens("10"), end, max_time: MAX_TIME });
        assert_eq!(decide(&lock_snapshot(lock, 30), &lock_policy), Decision::Skip(RunStatus::SkippedAlreadyMax));
    }
}

#[rstest]
fn target_days_shorter_than_maxtime_are_honoured(mut lock_policy: Policy) {
    lock_policy.target_lock_days = Some(365);
    let lock = Some(LockPosition { amount: tokens("10"), end: NOW + 100 * 86_400, max_time: MAX_TIME });

    let Decision::Act { unlock_time: Some(target), .. } = decide(&lock_snapshot(lock, 30), &lock_policy) else {
        panic!("expected the lock to be extended");
    };
    assert_eq!(target % WEEK_SECS, 0);
    assert!(target <= NOW + 365 * 86_400);
    assert!(target > NOW + 365 * 86_400 - WEEK_SECS);
}

#[rstest]
#[case(None, NOW + MAX_TIME)]
#[case(Some(7), NOW + 7 * 86_400)]
#[case(Some(100_000), NOW + MAX_TIME)]
fn target_is_capped_by_maxtime_and_rounded_to_weeks(#[case] days: Option<u64>, #[case] unrounded: u64) {
    let lock = LockPosition { amount: tokens("1"), end: 0, max_time: MAX_TIME };
    assert_eq!(target_unlock_time(&lock, NOW, days), unrounded / WEEK_SECS * WEEK_SECS);
}

#[test]
fn target_rounds_down_mid_week() {
    let lock = LockPosition { amount: tokens("1"), end: 0, max_time: 2 * WEEK_SECS };
    assert_eq!(target_unlock_time(&lock, NOW + 3 * 86_400, None), NOW + 2 * WEEK_SECS);
}
