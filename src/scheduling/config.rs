//! Configuration for the slot-status client.

use super::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default base URL for the schedule API gateway.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Configuration for [`SlotStatusClient`](super::SlotStatusClient).
///
/// Deserializes from JSON; omitted fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusClientConfig {
    /// Base URL of the schedule API
    pub base_url: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum attempts per lookup (first try included)
    pub max_retries: u32,
    /// Base delay between retries in milliseconds (exponential backoff)
    pub retry_base_delay_ms: u64,
    /// TTL for cached status reports in seconds
    pub cache_ttl_secs: u64,
}

impl Default for StatusClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 250,
            cache_ttl_secs: 5 * 60,
        }
    }
}

impl StatusClientConfig {
    /// Loads configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ScheduleError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| ScheduleError::InvalidConfig {
            message: format!("{}: {e}", path.display()),
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StatusClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base_url":"https://api.school.example","max_retries":5}}"#
        )
        .unwrap();

        let config = StatusClientConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "https://api.school.example");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.cache_ttl_secs, 300);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = StatusClientConfig::load_from_file(Path::new("/nonexistent/config.json"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig { .. }));
    }
}
