//! Engine configuration.

use std::time::Duration;

/// Configuration for the execution engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed wait between retries of a failed work item
    pub retry_backoff: Duration,
    /// Delay between successive task registrations
    pub task_pacing: Duration,
    /// Attempts after which a task analysis gives up (None = never)
    pub task_retry_limit: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_backoff: Duration::from_millis(2000),
            task_pacing: Duration::from_millis(150),
            task_retry_limit: None,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retry backoff.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set the task registration pacing.
    pub fn with_task_pacing(mut self, pacing: Duration) -> Self {
        self.task_pacing = pacing;
        self
    }

    /// Give up analyzing a task after `limit` failed attempts.
    pub fn with_task_retry_limit(mut self, limit: u32) -> Self {
        self.task_retry_limit = Some(limit);
        self
    }
}
