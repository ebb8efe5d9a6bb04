//! Completed task record - a task paired with the result it produced.

use serde::{Deserialize, Serialize};
use crate::Time;

/// A task whose analysis has concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    /// Task text
    pub task: String,

    /// Result text
    pub result: String,

    /// When the result was recorded
    pub completed_at: Time,
}

impl CompletedTask {
    /// Record a result for a task now.
    pub fn new(task: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            result: result.into(),
            completed_at: chrono::Utc::now(),
        }
    }
}
