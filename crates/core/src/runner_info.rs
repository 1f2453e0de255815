//! Decoder for the `/get-runners` response.
//!
//! The endpoint has shipped several shapes over time: a bare array, an
//! object with a `runners` array, or an object with a `data` array. Each
//! entry is either a plain runner name or an object whose name has to be
//! picked from one of several keys. Everything is normalized to
//! [`RunnerInfo`] here so the script editor only ever sees one shape.

use serde::Serialize;
use serde_json::Value;

/// A runner the script editor can offer as an assignment suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunnerInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RunnerInfo {
    /// A runner known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: None,
            runner_id: None,
            id: None,
        }
    }
}

/// Decode any known `/get-runners` body into runner infos.
///
/// Unknown shapes decode to an empty list; the suggestion list is optional
/// and must never block editing.
pub fn decode_runner_list(body: &Value) -> Vec<RunnerInfo> {
    let entries = match body {
        Value::Array(items) => items,
        Value::Object(map) => match (map.get("runners"), map.get("data")) {
            (Some(Value::Array(items)), _) => items,
            (_, Some(Value::Array(items))) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    entries.iter().map(decode_entry).collect()
}

fn decode_entry(entry: &Value) -> RunnerInfo {
    match entry {
        Value::String(name) => RunnerInfo::named(name.clone()),
        Value::Object(map) => {
            let id = map.get("id").and_then(scalar_text);
            let runner_id = map.get("runner_id").and_then(scalar_text).or_else(|| id.clone());
            let hostname = map
                .get("hostname")
                .and_then(scalar_text)
                .or_else(|| map.get("host").and_then(scalar_text));
            let name = map
                .get("name")
                .and_then(scalar_text)
                .or_else(|| map.get("runner_id").and_then(scalar_text))
                .or_else(|| id.clone())
                .unwrap_or_else(|| entry.to_string());

            RunnerInfo {
                name,
                hostname,
                runner_id,
                id,
            }
        }
        other => RunnerInfo::named(scalar_text(other).unwrap_or_else(|| other.to_string())),
    }
}

/// Text of a string or number value; `None` for null and structured values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
