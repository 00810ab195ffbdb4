//! HTTP client for slot-status lookups.
//!
//! The backend owns the authoritative view of booked sessions and holiday
//! calendars; this client asks it whether an instructor is committed in a
//! given (weekday, timeslot) window over a date range.

use super::config::StatusClientConfig;
use super::error::ScheduleError;
use super::types::{DateRange, SlotId, SlotStatusReport, Weekday};
use super::SlotStatusLookup;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Path for the slot-status endpoint.
const SLOT_STATUS_PATH: &str = "/api/v1/schedule/slot-status";

/// Production [`SlotStatusLookup`] backed by the schedule API.
///
/// Built per instructor; retries transient failures with exponential
/// backoff and jitter. Wrap in
/// [`CachedStatusLookup`](super::CachedStatusLookup) to memoize repeated
/// lookups across UI interactions.
pub struct SlotStatusClient {
    client: Client,
    config: StatusClientConfig,
    base_url: Url,
    instructor_id: u64,
}

impl SlotStatusClient {
    /// Creates a client for the given instructor.
    pub fn new(config: StatusClientConfig, instructor_id: u64) -> Result<Self, ScheduleError> {
        // Fail fast on an unusable base URL instead of per request.
        let base_url = Url::parse(&config.base_url)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ScheduleError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            config,
            base_url,
            instructor_id,
        })
    }

    /// Returns the instructor this client queries for.
    pub fn instructor_id(&self) -> u64 {
        self.instructor_id
    }

    /// Builds the slot-status endpoint URL from the base URL.
    fn endpoint_url(&self) -> Result<Url, ScheduleError> {
        Ok(self.base_url.join(SLOT_STATUS_PATH)?)
    }

    /// Performs a single lookup attempt.
    async fn fetch_status(
        &self,
        weekday: Weekday,
        slot: SlotId,
        range: &DateRange,
    ) -> Result<SlotStatusReport, ScheduleError> {
        let url = self.endpoint_url()?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("instructorId", self.instructor_id.to_string()),
                ("weekday", weekday.code().to_string()),
                ("timeslotId", slot.to_string()),
                ("startDate", range.start.to_string()),
                ("endDate", range.end.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScheduleError::UnexpectedResponse {
                message: format!("slot-status returned {}", response.status()),
            });
        }

        response
            .json::<SlotStatusReport>()
            .await
            .map_err(|e| ScheduleError::InvalidStatusPayload {
                message: e.to_string(),
            })
    }

    /// Calculates retry delay with exponential backoff and jitter.
    fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let base = self.config.retry_base_delay().as_millis() as u64;
        // Exponential backoff: base * 2^min(attempt-1, 5)
        let exponential = base * 2u64.pow(attempt.saturating_sub(1).min(5));
        // Cap at 10 seconds
        let capped = exponential.min(10_000);
        // Add jitter: 0-20% of the delay
        let jitter = rand::thread_rng().gen_range(0..=(capped / 5));
        Duration::from_millis(capped + jitter)
    }
}

impl SlotStatusLookup for SlotStatusClient {
    async fn slot_status(
        &self,
        weekday: Weekday,
        slot: SlotId,
        range: &DateRange,
    ) -> Result<SlotStatusReport, ScheduleError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            info!(
                instructor_id = self.instructor_id,
                weekday = weekday.code(),
                timeslot = %slot,
                attempt = attempt,
                "Fetching slot status"
            );

            match self.fetch_status(weekday, slot, range).await {
                Ok(report) => {
                    debug!(
                        weekday = weekday.code(),
                        timeslot = %slot,
                        status = ?report.status,
                        "Slot status received"
                    );
                    return Ok(report);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.calculate_retry_delay(attempt);
                    warn!(
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Slot status lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    return Err(ScheduleError::RetriesExhausted {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_backoff() {
        let client = SlotStatusClient::new(StatusClientConfig::default(), 42).unwrap();

        let d1 = client.calculate_retry_delay(1);
        let d2 = client.calculate_retry_delay(2);
        let d3 = client.calculate_retry_delay(3);

        // Each should be roughly double (with jitter)
        assert!(d2 > d1);
        assert!(d3 > d2);
        // Capped at 10s plus jitter
        assert!(client.calculate_retry_delay(30) <= Duration::from_millis(12_000));
    }

    #[test]
    fn test_endpoint_url_tolerates_trailing_slash() {
        for base in ["http://127.0.0.1:3000", "http://127.0.0.1:3000/"] {
            let config = StatusClientConfig {
                base_url: base.to_string(),
                ..Default::default()
            };
            let client = SlotStatusClient::new(config, 1).unwrap();
            assert_eq!(
                client.endpoint_url().unwrap().as_str(),
                "http://127.0.0.1:3000/api/v1/schedule/slot-status"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_base_url() {
        let config = StatusClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SlotStatusClient::new(config, 1),
            Err(ScheduleError::UrlError { .. })
        ));
    }
}
