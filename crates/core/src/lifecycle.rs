//! Agent lifecycle - the coarse run state gating the execution loop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Run state of one agent.
///
/// ```text
/// Offline → Running ⇄ Pausing → Paused → Running
///              ↓          ↓        ↓
///              └──────→ Stopped ←──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentLifecycle {
    /// Never started
    #[default]
    Offline,
    /// Actively executing work
    Running,
    /// Pause requested, applied at the next checkpoint
    Pausing,
    /// Suspended, resumable
    Paused,
    /// Terminal for this instance
    Stopped,
}

impl AgentLifecycle {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Staying in the same state is always allowed, and so is stopping.
    pub fn can_transition_to(self, next: AgentLifecycle) -> bool {
        use AgentLifecycle::*;

        if self == next || next == Stopped {
            return true;
        }

        matches!(
            (self, next),
            (Offline, Running) | (Running, Pausing) | (Pausing, Paused) | (Paused, Running)
        )
    }

    /// Whether the loop may keep executing work.
    pub fn is_running(self) -> bool {
        self == AgentLifecycle::Running
    }

    /// Whether this is the terminal state.
    pub fn is_stopped(self) -> bool {
        self == AgentLifecycle::Stopped
    }
}

impl fmt::Display for AgentLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentLifecycle::Offline => write!(f, "offline"),
            AgentLifecycle::Running => write!(f, "running"),
            AgentLifecycle::Pausing => write!(f, "pausing"),
            AgentLifecycle::Paused => write!(f, "paused"),
            AgentLifecycle::Stopped => write!(f, "stopped"),
        }
    }
}
