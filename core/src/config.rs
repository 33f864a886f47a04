//! Client configuration

use std::time::Duration;

use crate::transport::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the employee backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3001")
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry behaviour for idempotent requests
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Read `EMPLOYEE_API_URL` and `EMPLOYEE_API_TIMEOUT_SECS`, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("EMPLOYEE_API_URL").ok(),
            std::env::var("EMPLOYEE_API_TIMEOUT_SECS").ok(),
        )
    }

    /// Build a config from raw variable values. A blank URL and a timeout
    /// that is zero or not a whole number of seconds are ignored.
    pub fn from_vars(base_url: Option<String>, timeout_secs: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let config = Self::new(base_url);
        match timeout_secs.and_then(|secs| secs.trim().parse::<u64>().ok()) {
            Some(secs) if secs > 0 => config.with_timeout(Duration::from_secs(secs)),
            _ => config,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_retries, 1);
    }

    #[test]
    fn vars_override_defaults() {
        let config = ClientConfig::from_vars(
            Some(" http://hr.internal:8080 ".to_string()),
            Some("30".to_string()),
        );
        assert_eq!(config.base_url, "http://hr.internal:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        for url in [None, Some(String::new()), Some("   ".to_string())] {
            let config = ClientConfig::from_vars(url, None);
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }
    }

    #[test]
    fn zero_or_garbage_timeout_falls_back_to_default() {
        for secs in ["0", "ten", "-5", "1.5", ""] {
            let config = ClientConfig::from_vars(None, Some(secs.to_string()));
            assert_eq!(config.timeout, DEFAULT_TIMEOUT, "timeout {secs:?}");
        }
    }

    #[test]
    fn builders_override_defaults() {
        let config = ClientConfig::new("http://api.internal")
            .with_timeout(Duration::from_secs(3))
            .with_retry_policy(RetryPolicy::none());
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.retry.max_retries, 0);
    }
}
