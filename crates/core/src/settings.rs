//! Model settings and session credentials passed along with every call.

use serde::{Deserialize, Serialize};

/// Settings forwarded to the platform for each request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelSettings {
    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Token limit per completion
    pub max_tokens: u32,

    /// Language results should be written in
    pub language: String,

    /// User supplied API key, sent instead of a session token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_api_key: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.8,
            max_tokens: 500,
            language: "English".to_string(),
            custom_api_key: None,
        }
    }
}

impl ModelSettings {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set a custom API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.custom_api_key = Some(key.into());
        self
    }
}

/// Authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the platform
    pub access_token: String,
}

impl Session {
    /// Create a session from a bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}
