//! Counters and latency histogram for the NWS data path.
//!
//! `NwsDiagnostics` is constructed once at startup and shared via `Arc` with
//! the zone catalog and the forecast fetcher. Each value is held in an atomic
//! so callers can read a consistent-enough snapshot, and mirrored to the
//! `metrics` facade for the Prometheus exporter.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::observability::metrics::{
    CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL, FORECAST_DURATION_SECONDS, FORECAST_FAILURES_TOTAL,
    FORECAST_REQUESTS_TOTAL,
};

/// Monotonic diagnostics for zone and forecast lookups.
#[derive(Debug, Default)]
pub struct NwsDiagnostics {
    requests: AtomicU64,
    failures: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    /// Histogram samples, kept as count + sum for the snapshot.
    durations_count: AtomicU64,
    durations_micros: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticsSnapshot {
    pub requests: u64,
    pub failures: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub successful_fetches: u64,
    pub mean_duration_seconds: f64,
}

impl NwsDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a forecast request and return its 1-based sequence number.
    pub fn next_request(&self) -> u64 {
        counter!(FORECAST_REQUESTS_TOTAL).increment(1);
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        counter!(FORECAST_FAILURES_TOTAL).increment(1);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_HITS_TOTAL).increment(1);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        counter!(CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record the duration of a successful upstream fetch.
    pub fn record_duration(&self, elapsed: Duration) {
        self.durations_count.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        // Saturates; the closure never returns None so the update cannot fail.
        let _ = self
            .durations_micros
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(micros))
            });
        histogram!(FORECAST_DURATION_SECONDS).record(elapsed.as_secs_f64());
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let successful_fetches = self.durations_count.load(Ordering::Relaxed);
        let total_micros = self.durations_micros.load(Ordering::Relaxed);
        let mean_duration_seconds = if successful_fetches == 0 {
            0.0
        } else {
            (total_micros as f64 / successful_fetches as f64) / 1_000_000.0
        };

        DiagnosticsSnapshot {
            requests: self.requests(),
            failures: self.failures(),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            successful_fetches,
            mean_duration_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_sequence_starts_at_one() {
        let diagnostics = NwsDiagnostics::new();
        assert_eq!(diagnostics.next_request(), 1);
        assert_eq!(diagnostics.next_request(), 2);
        assert_eq!(diagnostics.requests(), 2);
    }

    #[test]
    fn test_oversized_duration_saturates() {
        let diagnostics = NwsDiagnostics::new();
        diagnostics.record_duration(Duration::from_secs(1));
        diagnostics.record_duration(Duration::MAX);

        let snapshot = diagnostics.snapshot();
        assert_eq!(snapshot.successful_fetches, 2);
        assert_eq!(diagnostics.durations_micros.load(Ordering::Relaxed), u64::MAX);
        assert!(snapshot.mean_duration_seconds > 1.0);
    }

    #[test]
    fn test_snapshot_mean_duration() {
        let diagnostics = NwsDiagnostics::new();
        assert_eq!(diagnostics.snapshot().mean_duration_seconds, 0.0);

        diagnostics.record_duration(Duration::from_millis(100));
        diagnostics.record_duration(Duration::from_millis(300));
        diagnostics.record_cache_hit();
        diagnostics.record_cache_miss();
        diagnostics.record_failure();

        let snapshot = diagnostics.snapshot();
        assert_eq!(snapshot.successful_fetches, 2);
        assert!((snapshot.mean_duration_seconds - 0.2).abs() < 1e-9);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.failures, 1);
    }

    #[test]
    fn test_concurrent_sequences_are_unique() {
        let diagnostics = Arc::new(NwsDiagnostics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let d = diagnostics.clone();
                std::thread::spawn(move || (0..100).map(|_| d.next_request()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert_eq!(all.last(), Some(&800));
    }
}
