//! Script entity as served by the job API, plus the request payload used
//! to create and update scripts.
//!
//! A script's parameters come in two shapes: the legacy `param` list of
//! bare names on the script itself, and the richer `parameters` records
//! returned next to it by `GET /scripts/{id}`. [`ScriptDetail::from_response`]
//! reconciles the two.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::serde_ext::{null_as_default, string_or_number};
use crate::types::{RawTimestamp, ScriptId};

// ---------------------------------------------------------------------------
// Parameter
// ---------------------------------------------------------------------------

/// Declared value type of a script parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParameterType {
    /// All types, in the order a picker should offer them.
    pub const ALL: [ParameterType; 5] = [
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::Array,
        Self::Object,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Parse a type name, ignoring case and surrounding whitespace.
    /// `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }

    /// Parse a type name, falling back to [`ParameterType::String`] for
    /// anything unrecognized.
    pub fn from_str_lossy(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_str_lossy).unwrap_or_default())
    }
}

/// A named input a script accepts.
///
/// `Default` is the blank record a form adds: empty name, `string` type,
/// optional, no description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ParameterType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Parameter {
    /// Build the record synthesized for a legacy bare parameter name.
    ///
    /// Legacy names carry no metadata, so they are treated as required
    /// strings with no description.
    pub fn from_legacy_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParameterType::String,
            required: true,
            description: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// The `param` field of a script, which the API serves in either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptParams {
    Names(Vec<String>),
    Records(Vec<Parameter>),
}

/// A script definition as stored by the job API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(deserialize_with = "string_or_number")]
    pub script_id: ScriptId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<ScriptParams>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runner: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: RawTimestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: RawTimestamp,
}

impl Script {
    /// Parameter names for list views, whichever shape `param` arrived in.
    pub fn param_names(&self) -> Vec<&str> {
        match &self.param {
            Some(ScriptParams::Names(names)) => names.iter().map(String::as_str).collect(),
            Some(ScriptParams::Records(records)) => {
                records.iter().map(|p| p.name.as_str()).collect()
            }
            None => Vec::new(),
        }
    }
}

/// Display label for the active flag.
pub fn status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

// ---------------------------------------------------------------------------
// Detail response
// ---------------------------------------------------------------------------

/// Raw body of `GET /scripts/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptDetailResponse {
    #[serde(default)]
    pub script: Option<Script>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<Parameter>,
}

/// A fetched script together with its resolved parameter records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDetail {
    pub script: Script,
    pub parameters: Vec<Parameter>,
}

impl ScriptDetail {
    /// Resolve a detail response into a script and its parameter records.
    ///
    /// A non-empty legacy name list on the script wins over the response's
    /// `parameters`. Records embedded in `script.param` are used only when
    /// the response carries none of its own. A missing script is
    /// [`CoreError::NotFound`].
    pub fn from_response(
        script_id: &str,
        response: ScriptDetailResponse,
    ) -> Result<Self, CoreError> {
        let script = response.script.ok_or_else(|| CoreError::NotFound {
            entity: "script",
            id: script_id.to_string(),
        })?;

        let parameters = match &script.param {
            Some(ScriptParams::Names(names)) if !names.is_empty() => names
                .iter()
                .map(|name| Parameter::from_legacy_name(name))
                .collect(),
            Some(ScriptParams::Records(records)) if response.parameters.is_empty() => {
                records.clone()
            }
            _ => response.parameters,
        };

        Ok(Self { script, parameters })
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Body of `PUT /scripts/{id}` and `POST /scripts`.
///
/// Only produced by the validator, so every list is already trimmed and
/// free of empty entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPayload {
    pub file_name: String,
    pub description: String,
    pub status: bool,
    pub param: Vec<String>,
    pub tag: Vec<String>,
    pub runner: Vec<String>,
}
