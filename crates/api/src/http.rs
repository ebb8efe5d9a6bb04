//! HTTP gateway to the agent platform.

use crate::{AgentApi, ApiRequest, TaskAnalysis};
use async_trait::async_trait;
use autoagent_core::{ApiError, CompletedTask};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Configuration for [`HttpAgentApi`].
#[derive(Debug, Clone)]
pub struct HttpApiConfig {
    /// Platform base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl HttpApiConfig {
    /// Config for a base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Agent platform client speaking JSON over HTTP.
pub struct HttpAgentApi {
    client: reqwest::Client,
    config: HttpApiConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    new_tasks: Vec<String>,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

impl HttpAgentApi {
    /// Build a client for the given config.
    pub fn new(config: HttpApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfiguration(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/agent/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &ApiRequest<'_>,
        body: Value,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("POST {} (run {})", url, request.run_id);

        let mut builder = self.client.post(&url).json(&body);
        if let Some(session) = request.session {
            builder = builder.bearer_auth(&session.access_token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let message = response.text().await.unwrap_or_default();
            return Err(self.classify_status(status, retry_after, message));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout)
            } else {
                ApiError::Remote {
                    status: status.as_u16(),
                    message: format!("invalid response body: {}", e),
                }
            }
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else if error.is_builder() {
            ApiError::InvalidConfiguration(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }

    /// Map a non-success HTTP status to the error taxonomy.
    pub fn classify_status(
        &self,
        status: StatusCode,
        retry_after: Option<Duration>,
        message: String,
    ) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::InvalidConfiguration(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { retry_after },
            StatusCode::REQUEST_TIMEOUT => ApiError::Timeout(self.config.timeout),
            _ => ApiError::Remote {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl AgentApi for HttpAgentApi {
    async fn get_initial_tasks(&self, request: &ApiRequest<'_>) -> Result<Vec<String>, ApiError> {
        let body = json!({
            "runId": request.run_id,
            "goal": request.goal,
            "modelSettings": request.settings,
        });
        let response: StartResponse = self.post("start", request, body).await?;
        Ok(response.new_tasks)
    }

    async fn analyze_task(
        &self,
        request: &ApiRequest<'_>,
        task: &str,
    ) -> Result<TaskAnalysis, ApiError> {
        let body = json!({
            "runId": request.run_id,
            "goal": request.goal,
            "task": task,
            "modelSettings": request.settings,
        });
        self.post("analyze", request, body).await
    }

    async fn summarize(
        &self,
        request: &ApiRequest<'_>,
        results: &[CompletedTask],
    ) -> Result<String, ApiError> {
        let results: Vec<Value> = results
            .iter()
            .map(|r| json!({ "task": r.task, "result": r.result }))
            .collect();
        let body = json!({
            "runId": request.run_id,
            "goal": request.goal,
            "results": results,
            "modelSettings": request.settings,
        });
        let response: SummaryResponse = self.post("summarize", request, body).await?;
        Ok(response.summary)
    }
}
