//! NWS data subsystem.
//!
//! # Data Flow
//! ```text
//! GET /zones
//!     → zones.rs (ZoneCatalog: cache.rs get-or-populate, single-flight)
//!     → static GeoJSON document on disk
//!
//! GET /forecast/{zone_id}
//!     → forecast.rs (ForecastFetcher: sequence, fault injection, span)
//!     → client.rs (NwsClient: retries, timeout)
//!     → api.weather.gov
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod forecast;
pub mod types;
pub mod zones;

pub use cache::{CacheLookup, ExpiringCache, MemoryCache};
pub use client::{ClientBuildError, NwsClient};
pub use error::ForecastError;
pub use forecast::{ForecastFetcher, SimulatedFaults};
pub use types::{Forecast, Zone};
pub use zones::{ZoneCatalog, ZoneList};
