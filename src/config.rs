use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "/api/sendmail";
pub const DEFAULT_RESET_DELAY_MS: u64 = 3_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("endpoint `{0}` must be an absolute path starting with `/`")]
    InvalidEndpoint(String),
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Knobs of the contact workflow. Missing keys fall back to the defaults.
///
/// ```json
/// { "endpoint": "/api/sendmail", "reset_delay_ms": 3000, "request_timeout_ms": 10000 }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactOptions {
    pub endpoint: String,
    pub reset_delay_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ContactOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ContactOptions {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with('/') {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }

    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_mail_endpoint() {
        let options = ContactOptions::default();
        assert_eq!(options.endpoint, "/api/sendmail");
        assert_eq!(options.reset_delay(), Duration::from_secs(3));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options = ContactOptions::from_json_str(r#"{ "reset_delay_ms": 500 }"#)
            .expect("partial config parses");
        assert_eq!(options.reset_delay(), Duration::from_millis(500));
        assert_eq!(options.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(options.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let error = ContactOptions::from_json_str(r#"{ "endpoint": "api/sendmail" }"#)
            .expect_err("endpoint must be absolute");
        assert!(matches!(
            error,
            ConfigError::InvalidEndpoint(endpoint) if endpoint == "api/sendmail"
        ));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let error = ContactOptions::from_json_str(r#"{ "request_timeout_ms": 0 }"#)
            .expect_err("timeout must be positive");
        assert!(matches!(error, ConfigError::ZeroRequestTimeout));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = ContactOptions::from_json_file("/definitely/not/here.json")
            .expect_err("missing file");
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
