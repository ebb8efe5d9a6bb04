//! Analysis of a single task.

use super::{AgentWork, WorkContext};
use async_trait::async_trait;
use autoagent_api::TaskAnalysis;
use autoagent_core::{ApiError, CompletedTask};
use tracing::{debug, warn};

/// Asks the platform for the result of one task.
///
/// Sub-tasks returned by the platform go to the backlog. A follow-up task is
/// only chained directly when no sub-tasks were registered.
#[derive(Debug)]
pub struct AnalyzeTaskWork {
    task: String,
    analysis: Option<TaskAnalysis>,
    failures: u32,
}

impl AnalyzeTaskWork {
    /// Create the work item for a task.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            analysis: None,
            failures: 0,
        }
    }
}

#[async_trait]
impl AgentWork for AnalyzeTaskWork {
    fn describe(&self) -> String {
        format!("analyze task \"{}\"", self.task)
    }

    async fn run(&mut self, ctx: &WorkContext) -> Result<(), ApiError> {
        let analysis = ctx.api.analyze_task(&ctx.request(), &self.task).await?;
        debug!(
            "Task \"{}\" analyzed ({} new task(s))",
            self.task,
            analysis.new_tasks.len()
        );
        self.analysis = Some(analysis);
        Ok(())
    }

    async fn conclude(&mut self, ctx: &WorkContext) -> anyhow::Result<()> {
        let Some(analysis) = &self.analysis else {
            return Ok(());
        };

        ctx.model
            .record_result(CompletedTask::new(self.task.clone(), analysis.result.clone()));
        ctx.messages.send_task_result(&self.task, &analysis.result);

        if !analysis.new_tasks.is_empty() {
            ctx.create_task_messages(&analysis.new_tasks).await;
        }
        Ok(())
    }

    fn next(&mut self) -> anyhow::Result<Option<Box<dyn AgentWork>>> {
        let follow_up = match &self.analysis {
            Some(analysis) if analysis.new_tasks.is_empty() => analysis.follow_up.clone(),
            _ => None,
        };
        Ok(follow_up.map(|task| Box::new(AnalyzeTaskWork::new(task)) as Box<dyn AgentWork>))
    }

    fn on_error(&mut self, ctx: &WorkContext, error: &ApiError) -> bool {
        self.failures += 1;
        ctx.messages.send_error_message(error);

        match ctx.config.task_retry_limit {
            Some(limit) if self.failures >= limit => {
                warn!(
                    "Giving up on task \"{}\" after {} failed attempt(s)",
                    self.task, self.failures
                );
                false
            }
            _ => true,
        }
    }
}
