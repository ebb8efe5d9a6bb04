//! Work items - the schedulable units of agent behavior.
//!
//! The engine only ever sees [`AgentWork`]; it never looks at which variant
//! it is driving.

use crate::{EngineConfig, MessageService, RunModel};
use async_trait::async_trait;
use autoagent_api::{AgentApi, ApiRequest};
use autoagent_core::{AgentLifecycle, ApiError, ModelSettings, Session};
use std::sync::Arc;
use tracing::debug;

pub mod analyze_task;
pub mod start_goal;
pub mod summarize;

pub use analyze_task::AnalyzeTaskWork;
pub use start_goal::StartGoalWork;
pub use summarize::SummarizeWork;

/// One unit of schedulable agent behavior.
#[async_trait]
pub trait AgentWork: Send {
    /// Short label for logs and for tagging a deferred conclusion.
    fn describe(&self) -> String;

    /// Perform the remote call. Retried by the engine's retry policy.
    async fn run(&mut self, ctx: &WorkContext) -> Result<(), ApiError>;

    /// Apply the side effects of a settled run. Called exactly once.
    async fn conclude(&mut self, ctx: &WorkContext) -> anyhow::Result<()>;

    /// Work to append to the queue after concluding.
    fn next(&mut self) -> anyhow::Result<Option<Box<dyn AgentWork>>> {
        Ok(None)
    }

    /// Called with a retryable error; return false to stop retrying this item.
    fn on_error(&mut self, _ctx: &WorkContext, _error: &ApiError) -> bool {
        true
    }
}

/// Everything a work item may touch.
pub struct WorkContext {
    /// Backlog and lifecycle
    pub model: Arc<dyn RunModel>,
    /// Message sink
    pub messages: Arc<dyn MessageService>,
    /// Remote execution gateway
    pub api: Arc<dyn AgentApi>,
    /// Model settings forwarded with every call
    pub settings: ModelSettings,
    /// Authenticated session
    pub session: Option<Session>,
    /// Engine configuration
    pub config: EngineConfig,
}

impl WorkContext {
    /// Request context for a gateway call.
    pub fn request(&self) -> ApiRequest<'_> {
        ApiRequest {
            run_id: self.model.id(),
            goal: self.model.goal(),
            settings: &self.settings,
            session: self.session.as_ref(),
        }
    }

    /// Current lifecycle of the run.
    pub fn lifecycle(&self) -> AgentLifecycle {
        self.model.get_lifecycle()
    }

    /// Announce each task and push it into the backlog, pacing registrations.
    ///
    /// Registration halts as soon as the run is stopped.
    pub async fn create_task_messages(&self, tasks: &[String]) {
        for task in tasks {
            if self.lifecycle().is_stopped() {
                debug!("Run stopped, not registering remaining tasks");
                break;
            }
            self.messages.start_task(task);
            self.model.add_task(task.clone());
            tokio::time::sleep(self.config.task_pacing).await;
        }
    }
}
