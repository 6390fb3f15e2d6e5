//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the forecast service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream weather API settings.
    pub upstream: UpstreamConfig,

    /// Zone catalog source and cache settings.
    pub catalog: CatalogConfig,

    /// HTTP response cache settings.
    pub output_cache: OutputCacheConfig,

    /// Retry policy for the upstream transport.
    pub retries: RetryConfig,

    /// Simulated failure injection.
    pub faults: FaultConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed for one inbound request, in seconds. Must exceed the
    /// upstream worst case (every attempt timing out, plus backoff).
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Upstream forecast API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base address of the weather API (scheme + host, optional path prefix).
    pub base_address: String,

    /// User-Agent header. api.weather.gov rejects requests without one.
    pub user_agent: String,

    /// Timeout for a single outbound attempt, in seconds.
    pub request_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_address: "https://api.weather.gov".to_string(),
            user_agent: concat!("forecast-api/", env!("CARGO_PKG_VERSION"), " (ops@example.com)")
                .to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Zone catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the GeoJSON zone document.
    pub zones_path: String,

    /// Absolute expiration of the parsed catalog, in seconds.
    pub cache_ttl_secs: u64,
}

impl CatalogConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            zones_path: "data/zones.json".to_string(),
            cache_ttl_secs: 3600,
        }
    }
}

/// Output (HTTP response) cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputCacheConfig {
    /// Enable response caching for `/zones` and `/forecast/{zone_id}`.
    pub enabled: bool,

    /// Lifetime of a cached `/zones` response, in seconds.
    pub zones_ttl_secs: u64,

    /// Lifetime of a cached `/forecast/{zone_id}` response, in seconds.
    pub forecast_ttl_secs: u64,

    /// Maximum number of cached forecast responses (one per zone id).
    pub max_entries: u64,
}

impl Default for OutputCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zones_ttl_secs: 3600,
            forecast_ttl_secs: 900,
            max_entries: 10_000,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Simulated failure injection for the forecast fetcher.
///
/// Every `every_nth` forecast request fails before reaching the upstream.
/// Enabled by default so that dashboards and retry behaviour have something to show.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaultConfig {
    pub enabled: bool,
    pub every_nth: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            every_nth: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
