//! TTL-based caching for slot-status lookups.
//!
//! The resolver runs on every toggle of a timeslot or day in the UI, so
//! identical lookups repeat within seconds. Wrapping any lookup in
//! [`CachedStatusLookup`] memoizes reports per (weekday, timeslot, date
//! range) instead of paying a backend round-trip each time.

use super::config::StatusClientConfig;
use super::error::ScheduleError;
use super::types::{DateRange, SlotId, SlotStatusReport, Weekday};
use super::SlotStatusLookup;
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Cache key for one status lookup.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct StatusKey {
    pub weekday: Weekday,
    pub slot: SlotId,
    pub range: DateRange,
}

/// A cached report with metadata.
#[derive(Clone)]
struct CachedReport {
    report: SlotStatusReport,
    cached_at: Instant,
    ttl: Duration,
}

/// Thread-safe TTL cache for slot-status reports.
///
/// Uses DashMap for concurrent access without external locking.
pub struct StatusCache {
    entries: DashMap<StatusKey, CachedReport>,
    default_ttl: Duration,
}

impl StatusCache {
    /// Creates a new cache with the specified default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Creates a cache with a 5-minute default TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }

    /// Gets a cached report if it exists and hasn't expired.
    pub fn get(&self, key: &StatusKey) -> Option<SlotStatusReport> {
        self.entries.get(key).and_then(|entry| {
            if entry.cached_at.elapsed() < entry.ttl {
                Some(entry.report.clone())
            } else {
                // Entry expired, remove it
                drop(entry);
                self.entries.remove(key);
                None
            }
        })
    }

    /// Inserts a report with the default TTL.
    pub fn insert(&self, key: StatusKey, report: SlotStatusReport) {
        self.insert_with_ttl(key, report, self.default_ttl);
    }

    /// Inserts a report with a custom TTL.
    pub fn insert_with_ttl(&self, key: StatusKey, report: SlotStatusReport, ttl: Duration) {
        self.entries.insert(
            key,
            CachedReport {
                report,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Invalidates (removes) a cached entry.
    pub fn invalidate(&self, key: &StatusKey) {
        self.entries.remove(key);
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries from the cache.
    pub fn cleanup_expired(&self) {
        self.entries
            .retain(|_, entry| entry.cached_at.elapsed() < entry.ttl);
    }

    /// Gets cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;

        for entry in self.entries.iter() {
            total += 1;
            if entry.cached_at.elapsed() >= entry.ttl {
                expired += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Memoizing wrapper around any [`SlotStatusLookup`].
///
/// Successful reports are cached; failures are not, so a transient error
/// does not poison subsequent lookups.
pub struct CachedStatusLookup<L> {
    inner: L,
    cache: StatusCache,
}

impl<L> CachedStatusLookup<L> {
    /// Wraps `inner` with a cache using the given TTL.
    pub fn new(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            cache: StatusCache::new(ttl),
        }
    }

    /// Wraps `inner` with a cache using the TTL from `config`.
    pub fn from_config(inner: L, config: &StatusClientConfig) -> Self {
        Self::new(inner, config.cache_ttl())
    }

    /// Returns the cache for inspection or invalidation.
    pub fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Returns the wrapped lookup.
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: SlotStatusLookup + Sync> SlotStatusLookup for CachedStatusLookup<L> {
    async fn slot_status(
        &self,
        weekday: Weekday,
        slot: SlotId,
        range: &DateRange,
    ) -> Result<SlotStatusReport, ScheduleError> {
        let key = StatusKey {
            weekday,
            slot,
            range: *range,
        };

        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let report = self.inner.slot_status(weekday, slot, range).await?;
        self.cache.insert(key, report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::SlotStatus;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(weekday: Weekday, slot: u32) -> StatusKey {
        StatusKey {
            weekday,
            slot: SlotId(slot),
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
            ),
        }
    }

    #[test]
    fn test_cache_hit_and_expiry() {
        let cache = StatusCache::new(Duration::from_secs(60));
        let k = key(Weekday::Monday, 1);

        assert!(cache.get(&k).is_none());
        cache.insert(k.clone(), SlotStatusReport::available());
        assert_eq!(cache.get(&k).unwrap().status, SlotStatus::Available);

        cache.insert_with_ttl(k.clone(), SlotStatusReport::available(), Duration::ZERO);
        assert!(cache.get(&k).is_none());
        // The expired entry was removed on read.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_count_expired_entries() {
        let cache = StatusCache::new(Duration::from_secs(60));
        cache.insert(key(Weekday::Monday, 1), SlotStatusReport::available());
        cache.insert_with_ttl(
            key(Weekday::Tuesday, 1),
            SlotStatusReport::available(),
            Duration::ZERO,
        );

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.active_entries, 1);

        cache.cleanup_expired();
        assert_eq!(cache.len(), 1);
    }

    struct CountingLookup {
        hits: AtomicUsize,
    }

    impl SlotStatusLookup for CountingLookup {
        async fn slot_status(
            &self,
            _weekday: Weekday,
            _slot: SlotId,
            _range: &DateRange,
        ) -> Result<SlotStatusReport, ScheduleError> {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Ok(SlotStatusReport::available())
        }
    }

    #[tokio::test]
    async fn test_cached_lookup_calls_inner_once_per_key() {
        let lookup = CachedStatusLookup::new(
            CountingLookup {
                hits: AtomicUsize::new(0),
            },
            Duration::from_secs(60),
        );
        let k = key(Weekday::Monday, 1);

        for _ in 0..3 {
            lookup
                .slot_status(k.weekday, k.slot, &k.range)
                .await
                .unwrap();
        }
        lookup
            .slot_status(Weekday::Tuesday, SlotId(1), &k.range)
            .await
            .unwrap();

        assert_eq!(lookup.inner().hits.load(Ordering::Relaxed), 2);
        assert_eq!(lookup.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_ttl() {
        // A zero TTL expires entries immediately, so every lookup goes to
        // the inner implementation.
        let config = StatusClientConfig {
            cache_ttl_secs: 0,
            ..Default::default()
        };
        let lookup = CachedStatusLookup::from_config(
            CountingLookup {
                hits: AtomicUsize::new(0),
            },
            &config,
        );
        let k = key(Weekday::Monday, 1);

        lookup
            .slot_status(k.weekday, k.slot, &k.range)
            .await
            .unwrap();
        lookup
            .slot_status(k.weekday, k.slot, &k.range)
            .await
            .unwrap();

        assert_eq!(lookup.inner().hits.load(Ordering::Relaxed), 2);
    }
}
