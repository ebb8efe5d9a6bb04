//! Retry policy wrapped around a work item's remote call.

use crate::{AgentWork, ThinkingIndicator, WorkContext};
use autoagent_core::{is_retryable_error, AgentLifecycle};
use std::time::Duration;
use tracing::{debug, error, warn};

/// How an execution attempt settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// `run()` succeeded
    Completed,
    /// The item declined to retry a retryable error
    Vetoed,
    /// A non-retryable error stopped the agent
    Fatal,
    /// The agent was stopped before the next attempt
    Cancelled,
}

/// Result of [`RetryPolicy::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOutcome {
    /// How it settled
    pub settlement: Settlement,
    /// Number of times `run()` was invoked
    pub attempts: u32,
}

/// Retries retryable failures with a fixed backoff and no attempt cap.
///
/// Fatal failures force the run to stopped. Nothing escapes: every call
/// settles.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given backoff.
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }

    /// Run `work` until it settles. The busy indicator is cleared afterwards.
    pub async fn execute(
        &self,
        work: &mut dyn AgentWork,
        ctx: &WorkContext,
        thinking: &ThinkingIndicator,
    ) -> RetryOutcome {
        let outcome = self.attempt_until_settled(work, ctx, thinking).await;
        thinking.set(false);
        debug!(
            "{} settled as {:?} after {} attempt(s)",
            work.describe(),
            outcome.settlement,
            outcome.attempts
        );
        outcome
    }

    async fn attempt_until_settled(
        &self,
        work: &mut dyn AgentWork,
        ctx: &WorkContext,
        thinking: &ThinkingIndicator,
    ) -> RetryOutcome {
        let mut attempts = 0;

        loop {
            // A stale call must not produce effects after an external stop
            if ctx.lifecycle().is_stopped() {
                return RetryOutcome {
                    settlement: Settlement::Cancelled,
                    attempts,
                };
            }

            attempts = attempts.saturating_add(1);
            let err = match work.run(ctx).await {
                Ok(()) => {
                    return RetryOutcome {
                        settlement: Settlement::Completed,
                        attempts,
                    }
                }
                Err(err) => err,
            };

            if !is_retryable_error(&err) {
                error!("{} failed fatally: {}", work.describe(), err);
                ctx.model.set_lifecycle(AgentLifecycle::Stopped);
                return RetryOutcome {
                    settlement: Settlement::Fatal,
                    attempts,
                };
            }

            if !work.on_error(ctx, &err) {
                warn!("{} will not be retried: {}", work.describe(), err);
                return RetryOutcome {
                    settlement: Settlement::Vetoed,
                    attempts,
                };
            }

            warn!(
                "{} failed (attempt {}), retrying in {:?}: {}",
                work.describe(),
                attempts,
                self.backoff,
                err
            );
            thinking.set(true);
            tokio::time::sleep(self.backoff).await;
        }
    }
}
