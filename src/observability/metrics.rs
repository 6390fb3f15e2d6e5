//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Name and describe the service metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `nws_forecast_requests_total` (counter): forecast lookups, including injected failures
//! - `nws_forecast_failures_total` (counter): failed forecast lookups
//! - `nws_zone_cache_hits_total` / `nws_zone_cache_misses_total` (counter): zone catalog cache
//! - `nws_forecast_request_duration_seconds` (histogram): successful upstream fetch latency
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Histogram buckets tuned for typical upstream API latencies

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::net::SocketAddr;

pub const FORECAST_REQUESTS_TOTAL: &str = "nws_forecast_requests_total";
pub const FORECAST_FAILURES_TOTAL: &str = "nws_forecast_failures_total";
pub const CACHE_HITS_TOTAL: &str = "nws_zone_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "nws_zone_cache_misses_total";
pub const FORECAST_DURATION_SECONDS: &str = "nws_forecast_request_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(FORECAST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install()?;

    describe_metrics();
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(FORECAST_REQUESTS_TOTAL, "Forecast requests received by the fetcher");
    describe_counter!(FORECAST_FAILURES_TOTAL, "Forecast requests that failed");
    describe_counter!(CACHE_HITS_TOTAL, "Zone catalog lookups served from cache");
    describe_counter!(CACHE_MISSES_TOTAL, "Zone catalog lookups that loaded the source document");
    describe_histogram!(
        FORECAST_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of successful upstream forecast requests"
    );
}
