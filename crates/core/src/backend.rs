//! The seam between the script editor and whatever stores scripts.
//!
//! The HTTP client implements [`ScriptBackend`] against the job API; tests
//! implement it with in-memory fakes.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::script::{ScriptDetail, ScriptPayload};

#[async_trait]
pub trait ScriptBackend: Send + Sync {
    /// `GET /scripts/{id}`, with parameters already resolved.
    async fn fetch_script(&self, script_id: &str) -> Result<ScriptDetail, CoreError>;

    /// `PUT /scripts/{id}`.
    async fn update_script(&self, script_id: &str, payload: &ScriptPayload)
        -> Result<(), CoreError>;

    /// `POST /scripts`. Returns the server's response body untouched.
    async fn create_script(&self, payload: &ScriptPayload) -> Result<serde_json::Value, CoreError>;

    /// `DELETE /scripts/{id}`.
    async fn delete_script(&self, script_id: &str) -> Result<(), CoreError>;
}
