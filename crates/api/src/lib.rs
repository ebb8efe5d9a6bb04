//! Remote execution gateway.
//!
//! The [`AgentApi`] trait is the only way the execution engine reaches the
//! agent platform. [`HttpAgentApi`] is the reqwest backed implementation.

#![warn(missing_docs)]

pub mod http;

pub use http::{HttpAgentApi, HttpApiConfig};

use async_trait::async_trait;
use autoagent_core::{ApiError, CompletedTask, ModelSettings, RunId, Session};
use serde::{Deserialize, Serialize};

/// Per-call context shared by every gateway operation.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    /// Run the call belongs to
    pub run_id: RunId,
    /// Goal of the run
    pub goal: &'a str,
    /// Model settings
    pub settings: &'a ModelSettings,
    /// Authenticated session, if any
    pub session: Option<&'a Session>,
}

/// Outcome of analyzing one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskAnalysis {
    /// Result text for the task
    pub result: String,

    /// A follow-up task to analyze right after this one
    pub follow_up: Option<String>,

    /// Sub-tasks to register in the backlog
    pub new_tasks: Vec<String>,
}

impl TaskAnalysis {
    /// Analysis with a result and nothing else.
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            ..Default::default()
        }
    }

    /// Add a follow-up task.
    pub fn with_follow_up(mut self, task: impl Into<String>) -> Self {
        self.follow_up = Some(task.into());
        self
    }

    /// Add sub-tasks for the backlog.
    pub fn with_new_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.new_tasks = tasks.into_iter().map(Into::into).collect();
        self
    }
}

/// Gateway to the agent platform.
///
/// Every call may fail; failures are classified with
/// [`autoagent_core::is_retryable_error`].
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Decompose the goal into an initial task list.
    async fn get_initial_tasks(&self, request: &ApiRequest<'_>) -> Result<Vec<String>, ApiError>;

    /// Produce the result (and possible continuations) for one task.
    async fn analyze_task(
        &self,
        request: &ApiRequest<'_>,
        task: &str,
    ) -> Result<TaskAnalysis, ApiError>;

    /// Digest the results gathered so far.
    async fn summarize(
        &self,
        request: &ApiRequest<'_>,
        results: &[CompletedTask],
    ) -> Result<String, ApiError>;
}
