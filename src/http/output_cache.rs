//! Response cache in front of the read endpoints.
//!
//! `/zones` is cached as a single entry, `/forecast/{zone_id}` once per zone
//! id. Only successful results are stored, and concurrent misses for the same
//! key share one computation.

use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OutputCacheConfig;
use crate::nws::{Forecast, ForecastError, ZoneList};

pub type ForecastList = Arc<Vec<Forecast>>;

pub struct OutputCache {
    enabled: bool,
    zones: Cache<(), ZoneList>,
    forecasts: Cache<String, ForecastList>,
}

impl OutputCache {
    pub fn new(config: &OutputCacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            zones: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(config.zones_ttl_secs))
                .build(),
            forecasts: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(Duration::from_secs(config.forecast_ttl_secs))
                .build(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(&OutputCacheConfig {
            enabled: false,
            ..OutputCacheConfig::default()
        })
    }

    pub async fn zones<F>(&self, load: F) -> ZoneList
    where
        F: Future<Output = ZoneList>,
    {
        if !self.enabled {
            return load.await;
        }
        self.zones.get_with((), load).await
    }

    pub async fn forecast<F>(&self, zone_id: &str, fetch: F) -> Result<ForecastList, Arc<ForecastError>>
    where
        F: Future<Output = Result<Vec<Forecast>, ForecastError>>,
    {
        let fetch = async move { fetch.await.map(Arc::new) };
        if !self.enabled {
            return fetch.await.map_err(Arc::new);
        }
        self.forecasts.try_get_with(zone_id.to_string(), fetch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn forecast(number: u32) -> Forecast {
        Forecast {
            number,
            name: format!("Period {}", number),
            start_time: None,
            end_time: None,
            is_daytime: None,
            temperature: None,
            temperature_unit: None,
            short_forecast: None,
            detailed_forecast: "Clear.".into(),
            wind_speed: None,
            wind_direction: None,
        }
    }

    #[tokio::test]
    async fn test_caches_per_zone() {
        let cache = OutputCache::new(&OutputCacheConfig::default());
        let fetch = |n: u32| async move { Ok::<_, ForecastError>(vec![forecast(n)]) };

        let a1 = cache.forecast("A", fetch(1)).await.unwrap();
        let a2 = cache.forecast("A", fetch(2)).await.unwrap();
        let b = cache.forecast("B", fetch(3)).await.unwrap();

        assert_eq!(a1[0].number, 1);
        assert_eq!(a2[0].number, 1);
        assert_eq!(b[0].number, 3);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = OutputCache::new(&OutputCacheConfig::default());

        let err = cache
            .forecast("A", async { Err::<Vec<Forecast>, _>(ForecastError::Simulated { sequence: 5 }) })
            .await
            .unwrap_err();
        assert!(matches!(*err, ForecastError::Simulated { sequence: 5 }));

        let ok = cache.forecast("A", async { Ok::<_, ForecastError>(vec![forecast(1)]) }).await.unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let cache = OutputCache::disabled();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .forecast("A", async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<Vec<Forecast>, ForecastError>(vec![])
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zones_cached() {
        let cache = OutputCache::new(&OutputCacheConfig::default());
        let first = cache.zones(async { Arc::new(Vec::new()) }).await;
        assert!(first.is_empty());

        let zone = crate::nws::Zone {
            key: "WAZ315".into(),
            name: "City of Seattle".into(),
            state: "WA".into(),
            observation_stations: vec!["KSEA".into()],
        };
        let second = cache.zones(async move { Arc::new(vec![zone]) }).await;
        assert!(second.is_empty());
    }
}
