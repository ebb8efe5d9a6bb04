//! Execution layer - work queue, retry policy, and the autonomous agent loop.

#![warn(missing_docs)]

pub mod config;
pub mod control;
pub mod engine;
pub mod message_service;
pub mod retry;
pub mod run_model;
pub mod thinking;
pub mod work;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::EngineConfig;
pub use control::AgentControl;
pub use engine::{AgentError, AutonomousAgent, RunOutcome};
pub use message_service::{ChannelMessageService, InMemoryMessageService, MessageService};
pub use retry::{RetryOutcome, RetryPolicy, Settlement};
pub use run_model::{InMemoryRunModel, RunModel};
pub use thinking::ThinkingIndicator;
pub use work::{AgentWork, AnalyzeTaskWork, StartGoalWork, SummarizeWork, WorkContext};
