//! Forecast fetcher.
//!
//! Looks up the forecast periods of one zone from the NWS API. Each call gets
//! a sequence number from the diagnostics counter and runs inside its own span,
//! so every log line of the call carries the zone id and that number.
//!
//! When simulated faults are enabled, every `every_nth` call fails before any
//! network traffic. This exists to exercise dashboards and client retries.

use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::FaultConfig;
use crate::nws::client::NwsClient;
use crate::nws::error::ForecastError;
use crate::nws::types::{Forecast, ForecastResponse};
use crate::observability::spans::{self, TRACE_TARGET};
use crate::observability::NwsDiagnostics;

/// Deterministic failure injection keyed on the request sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedFaults {
    enabled: bool,
    every_nth: u64,
}

impl SimulatedFaults {
    pub fn new(every_nth: u64) -> Self {
        Self {
            enabled: every_nth > 0,
            every_nth,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            every_nth: 0,
        }
    }

    pub fn from_config(config: &FaultConfig) -> Self {
        if config.enabled {
            Self::new(config.every_nth)
        } else {
            Self::disabled()
        }
    }

    pub fn should_fail(&self, sequence: u64) -> bool {
        self.enabled && sequence % self.every_nth == 0
    }
}

pub struct ForecastFetcher {
    client: NwsClient,
    diagnostics: Arc<NwsDiagnostics>,
    faults: SimulatedFaults,
}

impl ForecastFetcher {
    pub fn new(client: NwsClient, diagnostics: Arc<NwsDiagnostics>, faults: SimulatedFaults) -> Self {
        Self {
            client,
            diagnostics,
            faults,
        }
    }

    /// Fetch the forecast periods for `zone_id`, in upstream order.
    ///
    /// Dropping the returned future aborts the outbound request.
    pub async fn get_forecast_by_zone(&self, zone_id: &str) -> Result<Vec<Forecast>, ForecastError> {
        if zone_id.trim().is_empty() {
            return Err(ForecastError::InvalidZoneId);
        }

        let sequence = self.diagnostics.next_request();
        let span = spans::forecast_span(zone_id, sequence);
        let result = self
            .fetch(zone_id, sequence)
            .instrument(span.clone())
            .await;
        span.record("success", result.is_ok());
        result
    }

    async fn fetch(&self, zone_id: &str, sequence: u64) -> Result<Vec<Forecast>, ForecastError> {
        if self.faults.should_fail(sequence) {
            self.diagnostics.record_failure();
            tracing::warn!(target: TRACE_TARGET, "Injecting simulated forecast failure");
            return Err(ForecastError::Simulated { sequence });
        }

        let url = self.client.forecast_url(zone_id);
        tracing::debug!(target: TRACE_TARGET, url = %url, "Fetching zone forecast");

        let started = Instant::now();
        match self.client.get_json::<ForecastResponse>(&url).await {
            Ok(response) => {
                self.diagnostics.record_duration(started.elapsed());
                let forecasts: Vec<Forecast> = response
                    .properties
                    .periods
                    .into_iter()
                    .map(Forecast::from)
                    .collect();
                tracing::info!(target: TRACE_TARGET, periods = forecasts.len(), "Retrieved forecast");
                Ok(forecasts)
            }
            Err(e) => {
                self.diagnostics.record_failure();
                tracing::error!(
                    target: TRACE_TARGET,
                    status = e.status().map(|s| s.as_u16()),
                    error = %e,
                    "Forecast request failed"
                );
                Err(e)
            }
        }
    }
}
