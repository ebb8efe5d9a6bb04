//! Message sink - where an agent reports status and results.

use autoagent_core::{AgentMessage, ApiError};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Fire-and-forget sink for agent messages.
pub trait MessageService: Send + Sync {
    /// Deliver a message. Nothing is returned to the agent.
    fn send(&self, message: AgentMessage);

    /// Announce a newly registered task and return the message sent.
    fn start_task(&self, task: &str) -> AgentMessage {
        let message = AgentMessage::task_started(task);
        self.send(message.clone());
        message
    }

    /// Report a task result.
    fn send_task_result(&self, task: &str, result: &str) {
        self.send(AgentMessage::task_result(task, result));
    }

    /// Report that all work is done.
    fn send_completed_message(&self) {
        self.send(AgentMessage::Completed);
    }

    /// Report a gateway failure.
    fn send_error_message(&self, error: &ApiError) {
        self.send(AgentMessage::error(error.to_string()));
    }
}

/// Keeps every message in memory.
#[derive(Default)]
pub struct InMemoryMessageService {
    messages: Mutex<Vec<AgentMessage>>,
}

impl InMemoryMessageService {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages received so far.
    pub fn messages(&self) -> Vec<AgentMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl MessageService for InMemoryMessageService {
    fn send(&self, message: AgentMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

/// Forwards messages into an unbounded channel.
pub struct ChannelMessageService {
    tx: mpsc::UnboundedSender<AgentMessage>,
}

impl ChannelMessageService {
    /// Create a sink and the receiver its messages arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AgentMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageService for ChannelMessageService {
    fn send(&self, message: AgentMessage) {
        if self.tx.send(message).is_err() {
            debug!("Message receiver dropped, discarding message");
        }
    }
}
