//! Run model - owner of the task backlog and the lifecycle flag.

use autoagent_core::{AgentLifecycle, CompletedTask, RunId};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

/// State of one agent run, shared between the engine and its host.
///
/// Accessors are synchronous; the engine never holds them across an await.
pub trait RunModel: Send + Sync {
    /// Identifier of the run.
    fn id(&self) -> RunId;

    /// Goal the run works toward.
    fn goal(&self) -> &str;

    /// Current lifecycle.
    fn get_lifecycle(&self) -> AgentLifecycle;

    /// Overwrite the lifecycle.
    fn set_lifecycle(&self, lifecycle: AgentLifecycle);

    /// Remove and return the next pending task.
    fn get_current_task(&self) -> Option<String>;

    /// Append a task to the backlog.
    fn add_task(&self, task: String);

    /// Number of tasks still pending.
    fn remaining_tasks(&self) -> usize;

    /// Store the result of a concluded task.
    fn record_result(&self, completed: CompletedTask);

    /// Results recorded so far, oldest first.
    fn completed_tasks(&self) -> Vec<CompletedTask>;
}

/// In-memory run model.
///
/// Lifecycle changes are also published on a watch channel so hosts can
/// follow them without polling.
pub struct InMemoryRunModel {
    id: RunId,
    goal: String,
    tasks: Mutex<VecDeque<String>>,
    completed: Mutex<Vec<CompletedTask>>,
    lifecycle: watch::Sender<AgentLifecycle>,
}

impl InMemoryRunModel {
    /// Create an offline run for a goal.
    pub fn new(goal: impl Into<String>) -> Self {
        let (lifecycle, _) = watch::channel(AgentLifecycle::Offline);
        Self {
            id: RunId::new(),
            goal: goal.into(),
            tasks: Mutex::new(VecDeque::new()),
            completed: Mutex::new(Vec::new()),
            lifecycle,
        }
    }

    /// Subscribe to lifecycle changes.
    pub fn subscribe(&self) -> watch::Receiver<AgentLifecycle> {
        self.lifecycle.subscribe()
    }

    /// Snapshot of the pending backlog.
    pub fn pending_tasks(&self) -> Vec<String> {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl RunModel for InMemoryRunModel {
    fn id(&self) -> RunId {
        self.id
    }

    fn goal(&self) -> &str {
        &self.goal
    }

    fn get_lifecycle(&self) -> AgentLifecycle {
        *self.lifecycle.borrow()
    }

    fn set_lifecycle(&self, lifecycle: AgentLifecycle) {
        let previous = self.lifecycle.send_replace(lifecycle);
        if previous != lifecycle {
            debug!("Run {} lifecycle {} -> {}", self.id, previous, lifecycle);
        }
    }

    fn get_current_task(&self) -> Option<String> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).pop_front()
    }

    fn add_task(&self, task: String) {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).push_back(task);
    }

    fn remaining_tasks(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record_result(&self, completed: CompletedTask) {
        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(completed);
    }

    fn completed_tasks(&self) -> Vec<CompletedTask> {
        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
