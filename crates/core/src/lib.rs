//! autoagent core data models.
//!
//! This crate defines the plain data shared by the gateway, the execution
//! engine and hosts: lifecycle, messages, settings and the error taxonomy.

#![warn(missing_docs)]

// Core identities
mod id;

// Run state
mod lifecycle;
mod task;

// Host facing data
mod message;
mod settings;

// Errors
mod error;

// Re-exports
pub use id::RunId;
pub use lifecycle::AgentLifecycle;
pub use task::CompletedTask;
pub use message::AgentMessage;
pub use settings::{ModelSettings, Session};
pub use error::{ApiError, is_retryable_error};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
