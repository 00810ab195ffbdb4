//! Error types for the scheduling subsystem.

use thiserror::Error;

/// Errors that can occur while resolving availability or looking up
/// slot status.
///
/// Data-quality problems (unknown timeslot ids, malformed catalog entries,
/// malformed availability keys) are never represented here; the resolver
/// treats those as non-matching input. These variants cover I/O and
/// configuration faults only.
#[derive(Debug, Error, Clone)]
pub enum ScheduleError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server returned an unexpected response
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Slot-status payload could not be decoded
    #[error("Invalid status payload: {message}")]
    InvalidStatusPayload { message: String },

    /// Configuration is missing or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// Retries were exhausted without a usable response
    #[error("Gave up after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

impl ScheduleError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScheduleError::Network { .. } | ScheduleError::UnexpectedResponse { .. }
        )
    }
}

impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ScheduleError {
    fn from(err: url::ParseError) -> Self {
        ScheduleError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ScheduleError {
    fn from(err: std::io::Error) -> Self {
        ScheduleError::InvalidConfig {
            message: err.to_string(),
        }
    }
}
