//! Records shown by the jobs, runners, scripts, and logs listings.
//!
//! Field names follow the upstream API exactly (jobs use PascalCase keys),
//! so each type renames at the serde boundary and exposes snake_case
//! fields to Rust callers.

use serde::{Deserialize, Serialize};

use crate::script::Script;
use crate::serde_ext::{null_as_default, string_or_number};
use crate::types::RawTimestamp;

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// One dispatched job, as returned by `/get-jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "RunnerID", default, deserialize_with = "null_as_default")]
    pub runner_id: String,
    #[serde(rename = "MsgID", default, deserialize_with = "null_as_default")]
    pub msg_id: String,
    #[serde(rename = "Status", default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "RequestPayload", default, deserialize_with = "null_as_default")]
    pub request_payload: String,
    #[serde(rename = "ResponsePayload", default, deserialize_with = "null_as_default")]
    pub response_payload: String,
    #[serde(rename = "Timeout", default, deserialize_with = "null_as_default")]
    pub timeout: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: RawTimestamp,
}

/// Body of `/get-jobs`. Only `data` is populated by the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Job>,
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// A registered worker agent, as returned by `/get-runners` for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,
    /// Comma-separated labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
}

impl Runner {
    /// Labels from the comma-separated `tags` field, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Body of `/get-runners` when read as a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub runners: Vec<Runner>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Runner>,
}

impl RunnersResponse {
    pub fn into_runners(self) -> Vec<Runner> {
        if self.runners.is_empty() {
            self.data
        } else {
            self.runners
        }
    }
}

// ---------------------------------------------------------------------------
// Scripts
// ---------------------------------------------------------------------------

/// Body of `/get-scripts`; older servers use `data` instead of `scripts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: Vec<Script>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Script>,
}

impl ScriptsResponse {
    pub fn into_scripts(self) -> Vec<Script> {
        if self.scripts.is_empty() {
            self.data
        } else {
            self.scripts
        }
    }
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// Execution log captured for one job message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runner_id: String,
    /// Newline-separated output lines.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: RawTimestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: RawTimestamp,
}

/// Body of `/get-logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogEntry>,
}

/// Placeholder log records shown when the logs endpoint is unreachable.
pub fn sample_logs() -> Vec<LogEntry> {
    fn entry(
        msg_id: &str,
        runner_id: &str,
        logs: &str,
        status: &str,
        message: &str,
        created_at: &str,
        updated_at: &str,
    ) -> LogEntry {
        LogEntry {
            msg_id: msg_id.into(),
            runner_id: runner_id.into(),
            logs: logs.into(),
            status: status.into(),
            message: message.into(),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }

    vec![
        entry(
            "be038f31-e67f-495c-a04d-f3660d349030",
            "493bf9e80adb294d2c3fe6dfdd711e96",
            "Starting website check for test.com.vn\nConnecting to server...\nHTTP Status: 200 OK\nResponse time: 245ms\nCheck completed successfully",
            "success",
            "Website check completed",
            "2024-03-15T10:30:00Z",
            "2024-03-15T10:30:45Z",
        ),
        entry(
            "ae038f31-e67f-495c-a04d-f3660d349031",
            "123bf9e80adb294d2c3fe6dfdd711e96",
            "Starting backup process\nConnecting to database...\nConnection timeout after 30 seconds",
            "timeout",
            "Database connection timeout",
            "2024-03-15T11:00:00Z",
            "2024-03-15T11:00:35Z",
        ),
        entry(
            "ce038f31-e67f-495c-a04d-f3660d349032",
            "456bf9e80adb294d2c3fe6dfdd711e97",
            "Deployment started for app v2.1.0\nPulling latest image...\nStarting containers...\nHealth check passed\nDeployment completed",
            "done",
            "Application deployed successfully",
            "2024-03-15T12:15:00Z",
            "2024-03-15T12:17:30Z",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Render an upstream RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS` UTC.
///
/// Anything that does not parse is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
