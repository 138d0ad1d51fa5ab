//! Periodic watch scanning.
//!
//! Every tick lists the active watches and evaluates them one after another:
//! if the watched route has seats the watcher is told so directly, otherwise
//! the route is searched for seat-change alternatives. A bad watch is logged
//! and skipped; it never stops the rest of the scan.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, ProbeCache};
use crate::domain::{RouteDetails, StationId, Watch};
use crate::notify::{AlternativesReport, DirectAvailability, Notifier, render_all};
use crate::planner::{Planner, SearchConfig, SeatOracle, TimetableSource};
use crate::stations::StationNames;
use crate::store::{WatchKey, WatchStore};

/// Scanner settings.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Time between the start of one scan and the next
    pub interval: Duration,
    /// Also search alternatives when the watched route has seats
    pub notify_alternatives_with_direct: bool,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl ScannerConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            notify_alternatives_with_direct: false,
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    pub fn with_notify_alternatives_with_direct(mut self, enabled: bool) -> Self {
        self.notify_alternatives_with_direct = enabled;
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

/// What happened to one watch during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The watched route has seats
    Direct,
    /// Sold out, but alternatives were found
    Alternatives,
    /// Nothing to report
    Quiet,
    /// The record could not be decoded
    Skipped,
}

/// Totals for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub evaluated: usize,
    pub direct: usize,
    pub alternatives: usize,
    pub quiet: usize,
    pub skipped: usize,
}

impl ScanReport {
    fn record(&mut self, outcome: Outcome) {
        self.evaluated += 1;
        match outcome {
            Outcome::Direct => self.direct += 1,
            Outcome::Alternatives => self.alternatives += 1,
            Outcome::Quiet => self.quiet += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Evaluates watches on a fixed interval.
pub struct Scanner<S, U, N> {
    store: S,
    upstream: U,
    notifier: N,
    names: StationNames,
    config: ScannerConfig,
}

impl<S, U, N> Scanner<S, U, N>
where
    S: WatchStore,
    U: SeatOracle + TimetableSource,
    N: Notifier,
{
    pub fn new(store: S, upstream: U, notifier: N, names: StationNames, config: ScannerConfig) -> Self {
        Self {
            store,
            upstream,
            notifier,
            names,
            config,
        }
    }

    /// Scan forever.
    ///
    /// The first scan starts one interval after the call. Scans never
    /// overlap: a slow scan pushes the next one back.
    pub async fn run(&self) {
        let start = Instant::now() + self.config.interval;
        let mut interval = tokio::time::interval_at(start, self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.config.interval.as_secs(), "watch scanner started");

        loop {
            interval.tick().await;
            self.scan_once().await;
        }
    }

    /// Evaluate every active watch once.
    pub async fn scan_once(&self) -> ScanReport {
        let mut report = ScanReport::default();

        let watches = match self.store.active().await {
            Ok(watches) => watches,
            Err(e) => {
                warn!(error = %e, "failed to list watches");
                return report;
            }
        };

        // Outcomes are shared between watches for this scan only.
        let probes = ProbeCache::new(&self.upstream, &self.config.cache);
        let names = self.names.snapshot().await;

        for (key, raw) in &watches {
            let outcome = self.evaluate(key, raw, &probes, &names).await;
            debug!(watch = %key, ?outcome, "watch evaluated");
            report.record(outcome);
        }

        info!(
            evaluated = report.evaluated,
            direct = report.direct,
            alternatives = report.alternatives,
            quiet = report.quiet,
            skipped = report.skipped,
            cache_hits = probes.hits(),
            "scan complete"
        );

        report
    }

    async fn evaluate(
        &self,
        key: &WatchKey,
        raw: &str,
        probes: &ProbeCache<'_, U>,
        names: &HashMap<StationId, String>,
    ) -> Outcome {
        let watch = match Watch::decode(raw) {
            Ok(watch) => watch,
            Err(e) => {
                warn!(watch = %key, error = %e, "skipping malformed watch");
                return Outcome::Skipped;
            }
        };

        let details = match self
            .upstream
            .route_details(watch.route, watch.origin, watch.destination)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                warn!(watch = %key, route = %watch.route, error = %e, "failed to fetch route details");
                return Outcome::Quiet;
            }
        };

        let date = details.departure_date();

        if details.free_seats > 0 {
            let vehicles = self
                .upstream
                .vehicle_seats(watch.route, watch.origin, watch.destination)
                .await
                .unwrap_or_else(|e| {
                    warn!(watch = %key, route = %watch.route, error = %e, "failed to fetch vehicle seats");
                    Vec::new()
                });

            let availability = DirectAvailability { details, vehicles };
            if let Err(e) = self.notifier.notify_direct(&watch.target, &availability).await {
                warn!(watch = %key, error = %e, "failed to deliver direct notification");
            }

            let also_alternatives = date.filter(|_| self.config.notify_alternatives_with_direct);
            if let Some(date) = also_alternatives {
                self.alternatives(key, &watch, &availability.details, date, probes, names)
                    .await;
            }

            return Outcome::Direct;
        }

        let Some(date) = date else {
            warn!(watch = %key, route = %watch.route, "route details carry no departure date");
            return Outcome::Quiet;
        };

        if self.alternatives(key, &watch, &details, date, probes, names).await {
            Outcome::Alternatives
        } else {
            Outcome::Quiet
        }
    }

    /// Search and announce alternatives. Returns whether any were found.
    async fn alternatives(
        &self,
        key: &WatchKey,
        watch: &Watch,
        details: &RouteDetails,
        date: NaiveDate,
        probes: &ProbeCache<'_, U>,
        names: &HashMap<StationId, String>,
    ) -> bool {
        let planner = Planner::new(&self.upstream, probes, &self.config.search);

        let itineraries = match planner
            .find_alternatives(watch.route, watch.origin, watch.destination, date)
            .await
        {
            Ok(itineraries) => itineraries,
            Err(e) => {
                warn!(watch = %key, route = %watch.route, error = %e, "alternative search failed");
                return false;
            }
        };

        if itineraries.is_empty() {
            return false;
        }

        let report = AlternativesReport {
            from: names
                .get(&watch.origin)
                .cloned()
                .unwrap_or_else(|| details.departure_city.clone()),
            to: names
                .get(&watch.destination)
                .cloned()
                .unwrap_or_else(|| details.arrival_city.clone()),
            date,
            itineraries: render_all(&itineraries, names),
        };

        if let Err(e) = self.notifier.notify_alternatives(&watch.target, &report).await {
            warn!(watch = %key, error = %e, "failed to deliver alternatives notification");
        }

        true
    }
}
