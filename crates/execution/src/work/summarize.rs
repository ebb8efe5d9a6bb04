//! Summary over the results of a run.

use super::{AgentWork, WorkContext};
use async_trait::async_trait;
use autoagent_core::{AgentMessage, ApiError};

/// Asks the platform for a digest of every recorded result.
#[derive(Debug, Default)]
pub struct SummarizeWork {
    summary: Option<String>,
}

impl SummarizeWork {
    /// Create the work item.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentWork for SummarizeWork {
    fn describe(&self) -> String {
        "summarize".to_string()
    }

    async fn run(&mut self, ctx: &WorkContext) -> Result<(), ApiError> {
        let results = ctx.model.completed_tasks();
        let summary = ctx.api.summarize(&ctx.request(), &results).await?;
        self.summary = Some(summary);
        Ok(())
    }

    async fn conclude(&mut self, ctx: &WorkContext) -> anyhow::Result<()> {
        if let Some(summary) = self.summary.take() {
            ctx.messages.send(AgentMessage::summary(summary));
        }
        Ok(())
    }

    fn on_error(&mut self, ctx: &WorkContext, error: &ApiError) -> bool {
        ctx.messages.send_error_message(error);
        true
    }
}
