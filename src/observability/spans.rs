//! Trace spans for the NWS data path.
//!
//! One span per logical operation. Outcome fields are declared empty and
//! recorded when the operation finishes, so exporters see them on close.

use tracing::field::Empty;
use tracing::Span;

/// Target shared by every span and event emitted from the NWS modules.
pub const TRACE_TARGET: &str = "forecast_api::nws";

/// Span for one zone catalog lookup. Records `cache_hit`.
pub fn zones_span() -> Span {
    tracing::info_span!(target: TRACE_TARGET, "get_zones", cache_hit = Empty, zone_count = Empty)
}

/// Span for one forecast lookup. Records `success`.
///
/// Carries the zone id and request sequence so every log line emitted during
/// the call can be correlated.
pub fn forecast_span(zone_id: &str, sequence: u64) -> Span {
    tracing::info_span!(
        target: TRACE_TARGET,
        "get_forecast_by_zone",
        zone_id = %zone_id,
        sequence,
        success = Empty,
    )
}
