//! Host-side handle for steering a running agent.

use crate::RunModel;
use autoagent_core::AgentLifecycle;
use std::sync::Arc;
use tracing::{debug, info};

/// Cloneable pause/stop handle.
///
/// Only touches the lifecycle flag, so it can be used while the agent's
/// `run()` future is in flight elsewhere.
#[derive(Clone)]
pub struct AgentControl {
    model: Arc<dyn RunModel>,
}

impl AgentControl {
    /// Create a handle over a run model.
    pub fn new(model: Arc<dyn RunModel>) -> Self {
        Self { model }
    }

    /// Request a pause; applied at the engine's next checkpoint.
    pub fn pause(&self) {
        let lifecycle = self.model.get_lifecycle();
        if lifecycle.is_running() {
            info!("Pause requested for run {}", self.model.id());
            self.model.set_lifecycle(AgentLifecycle::Pausing);
        } else {
            debug!("Ignoring pause request while {}", lifecycle);
        }
    }

    /// Stop the agent. Always legal, never undone.
    pub fn stop(&self) {
        info!("Stopping run {}", self.model.id());
        self.model.set_lifecycle(AgentLifecycle::Stopped);
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> AgentLifecycle {
        self.model.get_lifecycle()
    }
}
