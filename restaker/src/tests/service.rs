use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rstest::*;
use tokio_util::sync::CancellationToken;

use crate::config::ConfigError;
use crate::service::{PolicySource, Scheduler};
use crate::tests::common::*;
use crate::types::{Policy, RunStatus};

const HOUR: Duration = Duration::from_secs(3600);

fn fixed_policy(policy: Policy) -> PolicySource {
    Box::new(move || Ok(policy.clone()))
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn runs_immediately_then_every_interval(restake_policy: Policy) {
    let (chain, broadcasts) = scripted_chain(ChainScript { pending_reward: tokens("0.3"), ..Default::default() });
    let history = Arc::new(MemoryHistory::default());
    let agent = Arc::new(agent_with(chain, Arc::new(StaticKeyProvider::new()), history.clone(), vec![]));
    let token = CancellationToken::new();

    let scheduler = Scheduler::new(agent, HOUR, false, fixed_policy(restake_policy), token.clone());
    let handle = tokio::spawn(scheduler.run());

    tokio::time::sleep(3 * HOUR + Duration::from_secs(1)).await;
    token.cancel();

    assert_eq!(handle.await.unwrap(), 4);
    let rows = history.rows();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.status == RunStatus::SkippedBelowThreshold));
    assert!(broadcasts.lock().unwrap().is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn policy_is_reloaded_each_tick_and_bad_config_skips_the_pass(restake_policy: Policy) {
    let (chain, _) = scripted_chain(ChainScript::default());
    let history = Arc::new(MemoryHistory::default());
    let agent = Arc::new(agent_with(chain, Arc::new(StaticKeyProvider::new()), history.clone(), vec![]));
    let token = CancellationToken::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let counter = loads.clone();
    let policy_source: PolicySource = Box::new(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        if n == 1 {
            return Err(ConfigError::MissingVersion.into());
        }
        Ok(restake_policy.clone())
    });
    let handle = tokio::spawn(Scheduler::new(agent, HOUR, true, policy_source, token.clone()).run());

    tokio::time::sleep(2 * HOUR + Duration::from_secs(1)).await;
    token.cancel();

    assert_eq!(handle.await.unwrap(), 3);
    assert_eq!(loads.load(Ordering::SeqCst), 3);
    let statuses: Vec<_> = history.rows().into_iter().map(|row| row.status).collect();
    assert_eq!(statuses, vec![RunStatus::DryRun, RunStatus::DryRun]);
}

#[rstest]
#[tokio::test]
async fn cancelled_before_start_runs_nothing(restake_policy: Policy) {
    let (chain, _) = scripted_chain(ChainScript::default());
    let history = Arc::new(MemoryHistory::default());
    let agent = Arc::new(agent_with(chain, Arc::new(StaticKeyProvider::new()), history.clone(), vec![]));
    let token = CancellationToken::new();
    token.cancel();

    let passes = Scheduler::new(agent, HOUR, false, fixed_policy(restake_policy), token).run().await;

    assert_eq!(passes, 0);
    assert!(history.rows().is_empty());
}
