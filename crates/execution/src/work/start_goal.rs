//! Goal decomposition into the initial task list.

use super::{AgentWork, WorkContext};
use async_trait::async_trait;
use autoagent_core::ApiError;
use tracing::info;

/// Asks the platform to break the goal into tasks.
///
/// The tasks land in the backlog; no direct continuation is produced.
#[derive(Debug, Default)]
pub struct StartGoalWork {
    tasks: Option<Vec<String>>,
}

impl StartGoalWork {
    /// Create the work item.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentWork for StartGoalWork {
    fn describe(&self) -> String {
        "start goal".to_string()
    }

    async fn run(&mut self, ctx: &WorkContext) -> Result<(), ApiError> {
        let tasks = ctx.api.get_initial_tasks(&ctx.request()).await?;
        info!("Goal decomposed into {} task(s)", tasks.len());
        self.tasks = Some(tasks);
        Ok(())
    }

    async fn conclude(&mut self, ctx: &WorkContext) -> anyhow::Result<()> {
        if let Some(tasks) = self.tasks.take() {
            ctx.create_task_messages(&tasks).await;
        }
        Ok(())
    }

    fn on_error(&mut self, ctx: &WorkContext, error: &ApiError) -> bool {
        ctx.messages.send_error_message(error);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, ScriptedApi};
    use crate::{EngineConfig, InMemoryRunModel, MessageService, RunModel};
    use autoagent_core::{AgentLifecycle, AgentMessage, ModelSettings};
    use std::sync::{Arc, Mutex};

    /// Sink that stops the run as soon as the first message arrives.
    struct StopOnFirstMessage {
        model: Arc<InMemoryRunModel>,
        sent: Mutex<Vec<AgentMessage>>,
    }

    impl MessageService for StopOnFirstMessage {
        fn send(&self, message: AgentMessage) {
            self.model.set_lifecycle(AgentLifecycle::Stopped);
            self.sent.lock().unwrap().push(message);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_conclude_registers_every_task_in_order() {
        let api = Arc::new(ScriptedApi::new(["Research X", "Draft Y"]));
        let (ctx, model, messages) = context(api);

        let mut work = StartGoalWork::new();
        work.run(&ctx).await.unwrap();
        assert_eq!(model.remaining_tasks(), 0);

        work.conclude(&ctx).await.unwrap();
        assert_eq!(model.pending_tasks(), vec!["Research X", "Draft Y"]);
        assert_eq!(
            messages.messages(),
            vec![
                AgentMessage::task_started("Research X"),
                AgentMessage::task_started("Draft Y"),
            ]
        );
        assert!(work.next().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_conclude_without_run_does_nothing() {
        let api = Arc::new(ScriptedApi::new(["Research X"]));
        let (ctx, model, messages) = context(api);

        StartGoalWork::new().conclude(&ctx).await.unwrap();
        assert_eq!(model.remaining_tasks(), 0);
        assert!(messages.messages().is_empty());
    }

    #[tokio::test]
    async fn test_on_error_reports_and_keeps_retrying() {
        let api = Arc::new(ScriptedApi::new(Vec::<String>::new()));
        let (ctx, _model, messages) = context(api);

        let mut work = StartGoalWork::new();
        assert!(work.on_error(&ctx, &ApiError::Network("reset".into())));
        assert_eq!(
            messages.messages(),
            vec![AgentMessage::error("Network error: reset")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_registration_midway() {
        let model = Arc::new(InMemoryRunModel::new("Write a report"));
        model.set_lifecycle(AgentLifecycle::Running);
        let messages = Arc::new(StopOnFirstMessage {
            model: model.clone(),
            sent: Mutex::new(Vec::new()),
        });
        let ctx = WorkContext {
            model: model.clone(),
            messages: messages.clone(),
            api: Arc::new(ScriptedApi::new(["Research X", "Draft Y", "Publish Z"])),
            settings: ModelSettings::default(),
            session: None,
            config: EngineConfig::default(),
        };

        let mut work = StartGoalWork::new();
        work.run(&ctx).await.unwrap();
        work.conclude(&ctx).await.unwrap();

        assert_eq!(model.pending_tasks(), vec!["Research X"]);
        assert_eq!(
            *messages.sent.lock().unwrap(),
            vec![AgentMessage::task_started("Research X")]
        );
    }
}
