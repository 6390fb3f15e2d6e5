//! Zone catalog loader.
//!
//! Reads the static GeoJSON zone document, keeps zones that have at least one
//! observation station, removes duplicates and caches the result.
//!
//! A missing or malformed document never fails the caller: it is logged and
//! yields an empty catalog, which is cached like any other result.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;

use crate::nws::cache::{ExpiringCache, MemoryCache};
use crate::nws::types::{Zone, ZoneCollection};
use crate::observability::spans::{self, TRACE_TARGET};
use crate::observability::NwsDiagnostics;

/// Cache key for the parsed catalog.
pub const ZONES_CACHE_KEY: &str = "zones";

pub type ZoneList = Arc<Vec<Zone>>;

/// Why the zone document could not be used.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("zone document {path} is unavailable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("zone document {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Cached access to the zone catalog.
pub struct ZoneCatalog<C = MemoryCache<ZoneList>> {
    path: PathBuf,
    ttl: Duration,
    cache: C,
    diagnostics: Arc<NwsDiagnostics>,
}

impl<C> ZoneCatalog<C>
where
    C: ExpiringCache<ZoneList>,
{
    pub fn new(
        path: impl Into<PathBuf>,
        ttl: Duration,
        cache: C,
        diagnostics: Arc<NwsDiagnostics>,
    ) -> Self {
        Self {
            path: path.into(),
            ttl,
            cache,
            diagnostics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the usable zones, loading the document on a cache miss.
    pub async fn get_zones(&self) -> ZoneList {
        let span = spans::zones_span();
        let lookup = self
            .cache
            .get_or_populate(ZONES_CACHE_KEY, self.ttl, self.populate())
            .instrument(span.clone())
            .await;

        if lookup.hit {
            self.diagnostics.record_cache_hit();
        } else {
            self.diagnostics.record_cache_miss();
        }
        span.record("cache_hit", lookup.hit);
        span.record("zone_count", lookup.value.len());

        lookup.value
    }

    async fn populate(&self) -> ZoneList {
        match load_zones(&self.path).await {
            Ok(zones) => {
                tracing::info!(
                    target: TRACE_TARGET,
                    path = %self.path.display(),
                    zones = zones.len(),
                    "Loaded zone catalog"
                );
                Arc::new(zones)
            }
            Err(e) => {
                tracing::warn!(target: TRACE_TARGET, error = %e, "Zone catalog unavailable, serving empty list");
                Arc::new(Vec::new())
            }
        }
    }
}

/// Read and filter the zone document at `path`.
pub async fn load_zones(path: &Path) -> Result<Vec<Zone>, CatalogError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_zones(&bytes).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a zone FeatureCollection, dropping station-less and duplicate zones.
pub fn parse_zones(bytes: &[u8]) -> Result<Vec<Zone>, serde_json::Error> {
    let collection: ZoneCollection = serde_json::from_slice(bytes)?;

    let mut seen = HashSet::new();
    let zones = collection
        .features
        .into_iter()
        .filter(|f| !f.properties.observation_stations.is_empty())
        .map(|f| Zone::from(f.properties))
        .filter(|zone| seen.insert(zone.clone()))
        .collect();

    Ok(zones)
}
