/// Scripts are addressed by an opaque, server-assigned string.
pub type ScriptId = String;

/// Upstream timestamps are kept as the raw strings the API returns.
pub type RawTimestamp = String;
