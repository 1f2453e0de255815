//! REST client for the job API.
//!
//! Wraps every endpoint the dashboard uses (job, runner, script, and log
//! listings plus script CRUD) using [`reqwest`]. Requests are issued once;
//! there is no retry or caching layer.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use jobdash_core::backend::ScriptBackend;
use jobdash_core::error::CoreError;
use jobdash_core::listing::{
    sample_logs, Job, JobsResponse, LogEntry, LogsResponse, Runner, RunnersResponse,
    ScriptsResponse,
};
use jobdash_core::runner_info::{decode_runner_list, RunnerInfo};
use jobdash_core::script::{Script, ScriptDetail, ScriptDetailResponse, ScriptPayload};

use crate::config::ClientConfig;

/// HTTP client for one job API deployment.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the job API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("HTTP error! status: {status}")]
    Http {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape expected for the endpoint.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The script detail response carried no script.
    #[error("Script {script_id} not found")]
    NotFound { script_id: String },
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => CoreError::Network(e.to_string()),
            ApiError::Http { status, .. } => CoreError::Http { status },
            ApiError::Decode(e) => CoreError::Decode(e.to_string()),
            ApiError::NotFound { script_id } => CoreError::NotFound {
                entity: "script",
                id: script_id,
            },
        }
    }
}

/// Logs listing result, flagging whether sample data stood in.
#[derive(Debug, Clone)]
pub struct LogsListing {
    pub logs: Vec<LogEntry>,
    /// Set when the request failed and built-in sample records were used.
    pub sample_reason: Option<String>,
}

impl DashboardApi {
    /// Build a client from configuration (base URL and request timeout).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- listings ----

    /// `GET /get-jobs`.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let body: JobsResponse = self.get_json("/get-jobs").await?;
        Ok(body.data)
    }

    /// `GET /get-runners`, read as full runner records.
    pub async fn list_runners(&self) -> Result<Vec<Runner>, ApiError> {
        let body: RunnersResponse = self.get_json("/get-runners").await?;
        Ok(body.into_runners())
    }

    /// `GET /get-runners`, decoded leniently into assignment suggestions.
    pub async fn runner_suggestions(&self) -> Result<Vec<RunnerInfo>, ApiError> {
        let body: serde_json::Value = self.get_json("/get-runners").await?;
        let runners = decode_runner_list(&body);
        tracing::debug!(count = runners.len(), "Decoded runner suggestions");
        Ok(runners)
    }

    /// `GET /get-scripts`.
    pub async fn list_scripts(&self) -> Result<Vec<Script>, ApiError> {
        let body: ScriptsResponse = self.get_json("/get-scripts").await?;
        Ok(body.into_scripts())
    }

    /// `GET /get-logs`.
    pub async fn list_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        let body: LogsResponse = self.get_json("/get-logs").await?;
        Ok(body.logs)
    }

    /// `GET /get-logs`, substituting sample records on failure when
    /// `fallback` is set.
    pub async fn list_logs_or_sample(&self, fallback: bool) -> Result<LogsListing, ApiError> {
        match self.list_logs().await {
            Ok(logs) => Ok(LogsListing {
                logs,
                sample_reason: None,
            }),
            Err(e) if fallback => {
                tracing::warn!(error = %e, "Log fetch failed, showing sample logs");
                Ok(LogsListing {
                    logs: sample_logs(),
                    sample_reason: Some(e.to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }

    // ---- scripts ----

    /// `GET /scripts/{id}`, with parameter records resolved.
    pub async fn get_script(&self, script_id: &str) -> Result<ScriptDetail, ApiError> {
        let body: ScriptDetailResponse = self.get_json(&format!("/scripts/{script_id}")).await?;
        ScriptDetail::from_response(script_id, body).map_err(|_| ApiError::NotFound {
            script_id: script_id.to_string(),
        })
    }

    /// `PUT /scripts/{id}`.
    pub async fn update_script(
        &self,
        script_id: &str,
        payload: &ScriptPayload,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/scripts/{script_id}")))
            .json(payload)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `POST /scripts`. Returns the response body as-is.
    pub async fn create_script(
        &self,
        payload: &ScriptPayload,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .post(self.url("/scripts"))
            .json(payload)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// `DELETE /scripts/{id}`.
    pub async fn delete_script(&self, script_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/scripts/{script_id}")))
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    /// Return the response unchanged on 2xx, or an [`ApiError::Http`] with
    /// the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON body. Decode failures are reported as
    /// [`ApiError::Decode`], not as transport errors.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ScriptBackend for DashboardApi {
    async fn fetch_script(&self, script_id: &str) -> Result<ScriptDetail, CoreError> {
        Ok(self.get_script(script_id).await?)
    }

    async fn update_script(
        &self,
        script_id: &str,
        payload: &ScriptPayload,
    ) -> Result<(), CoreError> {
        Ok(DashboardApi::update_script(self, script_id, payload).await?)
    }

    async fn create_script(&self, payload: &ScriptPayload) -> Result<serde_json::Value, CoreError> {
        Ok(DashboardApi::create_script(self, payload).await?)
    }

    async fn delete_script(&self, script_id: &str) -> Result<(), CoreError> {
        Ok(DashboardApi::delete_script(self, script_id).await?)
    }
}
