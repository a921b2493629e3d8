use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::agent::Agent;
use crate::error::AgentResult;
use crate::types::Policy;

/// Produces the policy for the next pass. Called once per tick so config edits take effect.
pub type PolicySource = Box<dyn Fn() -> AgentResult<Policy> + Send + Sync>;

/// Drives [`Agent::run_once`] on a fixed interval until cancelled.
pub struct Scheduler {
    agent: Arc<Agent>,
    interval: Duration,
    dry_run: bool,
    policy_source: PolicySource,
    cancellation_token: CancellationToken,
}

impl Scheduler {
    pub fn new(
        agent: Arc<Agent>,
        interval: Duration,
        dry_run: bool,
        policy_source: PolicySource,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { agent, interval, dry_run, policy_source, cancellation_token }
    }

    /// Runs a pass immediately, then once per interval. Returns the number of passes started.
    ///
    /// A pass in flight is never interrupted; cancellation takes effect between passes.
    pub async fn run(self) -> u64 {
        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut passes = 0;

        info!(interval_secs = self.interval.as_secs(), dry_run = self.dry_run, "Scheduler started");
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => break,
                _ = tick.tick() => {}
            }
            passes += 1;
            self.tick().await;
        }
        info!(passes, "Scheduler stopped");
        passes
    }

    async fn tick(&self) {
        let policy = match (self.policy_source)() {
            Ok(policy) => policy,
            Err(e) => {
                error!(error = %e, "Could not load policy, skipping this pass");
                return;
            }
        };

        match self.agent.run_once(&policy, self.dry_run).await {
            Ok(result) => info!(status = %result.status, "Scheduled pass finished"),
            Err(e) if e.is_abort() => warn!(error = %e, "Scheduled pass aborted, retrying on next tick"),
            Err(e) => error!(error = %e, error_chain = ?e, "Scheduled pass failed"),
        }
    }
}
