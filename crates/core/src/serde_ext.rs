//! Lenient deserializers for the upstream job API.
//!
//! The API is inconsistent about `null` versus missing fields and about
//! whether identifiers are strings or numbers. These helpers keep those
//! quirks out of the domain types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Decode `null` as `T::default()`. Pair with `#[serde(default)]` so a
/// missing field behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an identifier that may arrive as a JSON string or number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}
