//! Caching layer for leg probes within one scan tick.
//!
//! Watches on the same train probe many of the same hops. Within one tick
//! a hop's outcome is cached so each is asked of the upstream at most once.
//! A fresh cache is built for every tick, so availability is never reused
//! across scans, and failed probes are not cached at all.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, NaiveTime};
use moka::future::Cache as MokaCache;

use crate::domain::{SeatAvailability, StationId, Stop};
use crate::planner::{LegProbe, SeatOracle, probe_leg};
use crate::regiojet::UpstreamError;

/// Cache key for probe outcomes: (from, to, date, scheduled departure).
///
/// The departure identifies the train; two routes between the same stations
/// on the same day leave at different times.
type ProbeKey = (StationId, StationId, NaiveDate, NaiveTime);

/// Configuration for the probe cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached outcomes.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Seat oracle with per-tick memoisation of probe outcomes.
///
/// Wraps a `SeatOracle` and caches both feasible and infeasible outcomes.
pub struct ProbeCache<'a, O> {
    oracle: &'a O,
    outcomes: MokaCache<ProbeKey, Option<SeatAvailability>>,
    hits: AtomicU64,
}

impl<'a, O: SeatOracle> ProbeCache<'a, O> {
    /// Create an empty cache in front of `oracle`.
    pub fn new(oracle: &'a O, config: &CacheConfig) -> Self {
        let outcomes = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self {
            oracle,
            outcomes,
            hits: AtomicU64::new(0),
        }
    }

    /// Number of probes answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of cached outcomes.
    pub async fn entry_count(&self) -> u64 {
        // Pending inserts are only counted once maintenance has run.
        self.outcomes.run_pending_tasks().await;
        self.outcomes.entry_count()
    }
}

impl<O: SeatOracle> LegProbe for ProbeCache<'_, O> {
    async fn availability(
        &self,
        from: &Stop,
        to: &Stop,
        date: NaiveDate,
    ) -> Result<Option<SeatAvailability>, UpstreamError> {
        let Some(departure) = from.scheduled_departure else {
            return probe_leg(self.oracle, from, to, date).await;
        };
        let key = (from.station, to.station, date, departure);

        if let Some(cached) = self.outcomes.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached);
        }

        let outcome = probe_leg(self.oracle, from, to, date).await?;
        self.outcomes.insert(key, outcome.clone()).await;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteId;
    use crate::regiojet::MockUpstream;

    fn station(n: i64) -> StationId {
        StationId::from_raw(n).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn ten() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn default_config() {
        assert_eq!(CacheConfig::default().max_capacity, 10_000);
    }

    #[tokio::test]
    async fn repeated_probe_served_from_cache() {
        let mock = MockUpstream::new();
        let route = RouteId::from_raw(7).unwrap();
        mock.add_leg(route, station(1), station(2), date(), ten(), 3, 50.0)
            .await;

        let cache = ProbeCache::new(&mock, &CacheConfig::default());
        let from = Stop::new(station(1), 0, Some(ten()));
        let to = Stop::new(station(2), 1, None);

        let first = cache.availability(&from, &to, date()).await.unwrap();
        let second = cache.availability(&from, &to, date()).await.unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(mock.search_calls(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn infeasible_outcome_cached() {
        let mock = MockUpstream::new();
        let cache = ProbeCache::new(&mock, &CacheConfig::default());
        let from = Stop::new(station(1), 0, Some(ten()));
        let to = Stop::new(station(2), 1, None);

        assert_eq!(cache.availability(&from, &to, date()).await.unwrap(), None);
        assert_eq!(cache.availability(&from, &to, date()).await.unwrap(), None);
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test]
    async fn failures_not_cached() {
        let mock = MockUpstream::new();
        mock.fail_search(station(1), station(2)).await;

        let cache = ProbeCache::new(&mock, &CacheConfig::default());
        let from = Stop::new(station(1), 0, Some(ten()));
        let to = Stop::new(station(2), 1, None);

        assert!(cache.availability(&from, &to, date()).await.is_err());
        assert!(cache.availability(&from, &to, date()).await.is_err());
        assert_eq!(mock.search_calls(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[tokio::test]
    async fn different_departures_are_different_trains() {
        let mock = MockUpstream::new();
        let cache = ProbeCache::new(&mock, &CacheConfig::default());
        let to = Stop::new(station(2), 1, None);

        let ten_oclock = Stop::new(station(1), 0, Some(ten()));
        let eleven = Stop::new(station(1), 0, NaiveTime::from_hms_opt(11, 0, 0));

        cache.availability(&ten_oclock, &to, date()).await.unwrap();
        cache.availability(&eleven, &to, date()).await.unwrap();

        assert_eq!(mock.search_calls(), 2);
    }

    #[tokio::test]
    async fn new_cache_forgets_outcomes() {
        let mock = MockUpstream::new();
        let from = Stop::new(station(1), 0, Some(ten()));
        let to = Stop::new(station(2), 1, None);

        let tick_one = ProbeCache::new(&mock, &CacheConfig::default());
        tick_one.availability(&from, &to, date()).await.unwrap();

        let tick_two = ProbeCache::new(&mock, &CacheConfig::default());
        tick_two.availability(&from, &to, date()).await.unwrap();

        assert_eq!(mock.search_calls(), 2);
    }
}
