/// Default job API location for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the job API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Serve built-in sample logs when `/get-logs` fails (default: `true`).
    pub sample_logs_fallback: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sample_logs_fallback: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `API_BASE_URL`         | `http://localhost:5000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `SAMPLE_LOGS_FALLBACK` | `true`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL")
            .map(|v| normalize_base_url(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: raw.clone(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let sample_logs_fallback = match lookup("SAMPLE_LOGS_FALLBACK") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "SAMPLE_LOGS_FALLBACK",
                expected: "true or false",
                value: raw.clone(),
            })?,
            None => true,
        };

        Ok(Self {
            base_url,
            request_timeout_secs,
            sample_logs_fallback,
        })
    }

    /// Replace the base URL, e.g. from a command-line flag.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        assert_eq!(config_from(&[]).unwrap(), ClientConfig::default());
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let config = config_from(&[("API_BASE_URL", "http://10.0.0.5:5000/ ")]).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:5000");
    }

    #[test]
    fn blank_base_url_uses_default() {
        let config = config_from(&[("API_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_timeout_is_an_error() {
        let err = config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn sample_fallback_parses_common_spellings() {
        assert!(!config_from(&[("SAMPLE_LOGS_FALLBACK", "off")]).unwrap().sample_logs_fallback);
        assert!(config_from(&[("SAMPLE_LOGS_FALLBACK", "YES")]).unwrap().sample_logs_fallback);
        assert!(config_from(&[("SAMPLE_LOGS_FALLBACK", "maybe")]).is_err());
    }

    #[test]
    fn with_base_url_overrides() {
        let config = ClientConfig::default().with_base_url("http://api.internal/");
        assert_eq!(config.base_url, "http://api.internal");
    }
}
