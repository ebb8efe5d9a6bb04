//! Messages emitted by an agent to its host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A status or result message sent through the message sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AgentMessage {
    /// A task was registered in the backlog
    TaskStarted {
        /// Task text
        task: String,
    },

    /// A task produced a result
    TaskResult {
        /// Task text
        task: String,
        /// Result text
        result: String,
    },

    /// Digest over the results of a run
    Summary {
        /// Summary text
        summary: String,
    },

    /// All work and all queued tasks are done
    Completed,

    /// Something went wrong while talking to the platform
    Error {
        /// Human readable description
        message: String,
    },
}

impl AgentMessage {
    /// Message for a newly registered task.
    pub fn task_started(task: impl Into<String>) -> Self {
        Self::TaskStarted { task: task.into() }
    }

    /// Message for a task result.
    pub fn task_result(task: impl Into<String>, result: impl Into<String>) -> Self {
        Self::TaskResult {
            task: task.into(),
            result: result.into(),
        }
    }

    /// Message carrying a run summary.
    pub fn summary(summary: impl Into<String>) -> Self {
        Self::Summary {
            summary: summary.into(),
        }
    }

    /// Error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl fmt::Display for AgentMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentMessage::TaskStarted { task } => write!(f, "Added task: {}", task),
            AgentMessage::TaskResult { task, result } => write!(f, "Executing \"{}\": {}", task, result),
            AgentMessage::Summary { summary } => write!(f, "Summary: {}", summary),
            AgentMessage::Completed => write!(f, "All tasks completed. Shutting down."),
            AgentMessage::Error { message } => write!(f, "Error: {}", message),
        }
    }
}
