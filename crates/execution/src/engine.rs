//! The autonomous agent - drives the work queue toward the goal.

use crate::{
    AgentControl, AgentWork, AnalyzeTaskWork, EngineConfig, MessageService, RetryPolicy, RunModel,
    StartGoalWork, SummarizeWork, ThinkingIndicator, WorkContext,
};
use autoagent_api::AgentApi;
use autoagent_core::{AgentLifecycle, ModelSettings, Session};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Errors surfaced to the host by [`AutonomousAgent`].
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// `run()` or `summarize()` was invoked while another call was in flight
    #[error("Agent is already running")]
    AlreadyRunning,

    /// A work item's own post-processing failed
    #[error("Work item failed: {0}")]
    Work(#[from] anyhow::Error),
}

/// How a call to [`AutonomousAgent::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Queue and backlog drained; the agent stopped itself
    Completed,
    /// A pause was applied; call `run()` again to resume
    Paused,
    /// The agent was stopped
    Stopped,
}

/// Conclusion of the item that was executing when the agent left running.
struct PendingConclusion {
    work: Box<dyn AgentWork>,
}

impl PendingConclusion {
    fn new(work: Box<dyn AgentWork>) -> Self {
        Self { work }
    }

    fn describe(&self) -> String {
        self.work.describe()
    }

    /// Conclude the item and hand back its continuation.
    async fn replay(mut self, ctx: &WorkContext) -> anyhow::Result<Option<Box<dyn AgentWork>>> {
        self.work.conclude(ctx).await?;
        self.work.next()
    }
}

#[derive(Default)]
struct EngineState {
    queue: VecDeque<Box<dyn AgentWork>>,
    pending: Option<PendingConclusion>,
}

/// The autonomous agent.
///
/// Runs the loop:
/// ```text
/// Pop head → Execute (with retries) → Conclude → Append next → Refill
/// ```
/// One loop per instance; a second `run()` while one is in flight is
/// rejected with [`AgentError::AlreadyRunning`].
pub struct AutonomousAgent {
    ctx: WorkContext,
    retry: RetryPolicy,
    thinking: ThinkingIndicator,
    state: Mutex<EngineState>,
}

impl AutonomousAgent {
    /// Create an agent whose queue starts with goal decomposition.
    pub fn new(
        model: Arc<dyn RunModel>,
        messages: Arc<dyn MessageService>,
        settings: ModelSettings,
        api: Arc<dyn AgentApi>,
        session: Option<Session>,
    ) -> Self {
        let config = EngineConfig::default();
        let mut queue: VecDeque<Box<dyn AgentWork>> = VecDeque::new();
        queue.push_back(Box::new(StartGoalWork::new()));

        Self {
            retry: RetryPolicy::new(config.retry_backoff),
            ctx: WorkContext {
                model,
                messages,
                api,
                settings,
                session,
                config,
            },
            thinking: ThinkingIndicator::new(),
            state: Mutex::new(EngineState {
                queue,
                pending: None,
            }),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.retry = RetryPolicy::new(config.retry_backoff);
        self.ctx.config = config;
        self
    }

    /// Handle for pausing or stopping from another task.
    pub fn control(&self) -> AgentControl {
        AgentControl::new(self.ctx.model.clone())
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> AgentLifecycle {
        self.ctx.lifecycle()
    }

    /// Subscribe to this agent's busy indicator.
    pub fn thinking(&self) -> watch::Receiver<bool> {
        self.thinking.subscribe()
    }

    /// Whether the agent is waiting to retry.
    pub fn is_thinking(&self) -> bool {
        self.thinking.get()
    }

    /// Label of the deferred conclusion, if one is stored.
    ///
    /// Waits for an in-flight `run()` to return.
    pub async fn pending_conclusion(&self) -> Option<String> {
        self.state.lock().await.pending.as_ref().map(PendingConclusion::describe)
    }

    /// Labels of the queued work items, head first.
    ///
    /// Waits for an in-flight `run()` to return.
    pub async fn queued_work(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .queue
            .iter()
            .map(|work| work.describe())
            .collect()
    }

    /// Request a pause at the next checkpoint.
    pub fn pause_agent(&self) {
        self.control().pause();
    }

    /// Stop the agent.
    pub fn stop_agent(&self) {
        self.control().stop();
    }

    /// Drive the queue until it drains, a pause is applied, or the agent stops.
    ///
    /// A conclusion deferred by an earlier pause is replayed first.
    pub async fn run(&self) -> Result<RunOutcome, AgentError> {
        let mut state = self
            .state
            .try_lock()
            .map_err(|_| AgentError::AlreadyRunning)?;

        if self.lifecycle().is_stopped() {
            debug!("Run {} is stopped, nothing to do", self.ctx.model.id());
            return Ok(RunOutcome::Stopped);
        }

        self.transition(AgentLifecycle::Running);
        info!(
            "Running agent {} for goal: {}",
            self.ctx.model.id(),
            self.ctx.model.goal()
        );

        if let Some(pending) = state.pending.take() {
            info!("Replaying conclusion of {}", pending.describe());
            if let Some(next) = pending.replay(&self.ctx).await? {
                state.queue.push_back(next);
            }
        }

        self.refill(&mut state);
        while !state.queue.is_empty() {
            // Checkpoint before selecting work
            if self.lifecycle() == AgentLifecycle::Pausing {
                self.transition(AgentLifecycle::Paused);
            }
            if !self.lifecycle().is_running() {
                break;
            }

            if let Some(work) = state.queue.front_mut() {
                self.retry
                    .execute(work.as_mut(), &self.ctx, &self.thinking)
                    .await;
            }
            let Some(mut work) = state.queue.pop_front() else {
                break;
            };

            // Checkpoint after the attempt settled
            let lifecycle = self.lifecycle();
            if lifecycle.is_stopped() {
                debug!("Agent stopped, discarding {}", work.describe());
                break;
            }
            if !lifecycle.is_running() {
                info!("Agent {}, deferring conclusion of {}", lifecycle, work.describe());
                state.pending = Some(PendingConclusion::new(work));
                break;
            }

            work.conclude(&self.ctx).await?;
            if let Some(next) = work.next()? {
                debug!("Queueing {}", next.describe());
                state.queue.push_back(next);
            }

            self.refill(&mut state);
        }

        if self.lifecycle() == AgentLifecycle::Pausing {
            self.transition(AgentLifecycle::Paused);
        }
        match self.lifecycle() {
            AgentLifecycle::Running => {}
            AgentLifecycle::Paused => {
                info!("Agent {} paused", self.ctx.model.id());
                return Ok(RunOutcome::Paused);
            }
            _ => return Ok(RunOutcome::Stopped),
        }

        info!("Agent {} finished all tasks", self.ctx.model.id());
        self.ctx.messages.send_completed_message();
        self.stop_agent();
        Ok(RunOutcome::Completed)
    }

    /// Produce a summary of the recorded results, outside the work queue.
    ///
    /// Brings the agent back to running for the call, even from stopped, and
    /// leaves it stopped afterwards.
    pub async fn summarize(&self) -> Result<(), AgentError> {
        let _state = self
            .state
            .try_lock()
            .map_err(|_| AgentError::AlreadyRunning)?;

        self.ctx.model.set_lifecycle(AgentLifecycle::Running);
        let mut work = SummarizeWork::new();
        self.retry.execute(&mut work, &self.ctx, &self.thinking).await;

        let concluded = if self.lifecycle().is_running() {
            work.conclude(&self.ctx).await
        } else {
            debug!("Agent stopped while summarizing, dropping summary");
            Ok(())
        };

        self.stop_agent();
        concluded.map_err(AgentError::from)
    }

    /// Move to `next` if the lifecycle table allows it.
    fn transition(&self, next: AgentLifecycle) -> bool {
        let current = self.lifecycle();
        if !current.can_transition_to(next) {
            warn!("Refusing lifecycle transition {} -> {}", current, next);
            return false;
        }
        self.ctx.model.set_lifecycle(next);
        true
    }

    /// Queue the next backlog task if the queue ran dry.
    fn refill(&self, state: &mut EngineState) {
        if !state.queue.is_empty() {
            return;
        }
        if let Some(task) = self.ctx.model.get_current_task() {
            debug!("Refilling queue with task: {}", task);
            state.queue.push_back(Box::new(AnalyzeTaskWork::new(task)));
        }
    }
}
