//! Shared utilities for integration tests.

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use forecast_api::config::ServiceConfig;
use forecast_api::lifecycle::Shutdown;
use forecast_api::observability::NwsDiagnostics;
use forecast_api::HttpServer;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use wiremock::MockServer;

/// A running server plus the handles a test needs to inspect and stop it.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub diagnostics: Arc<NwsDiagnostics>,
    pub client: reqwest::Client,
    pub zones_path: PathBuf,
    // Keeps the zone document alive for the lifetime of the service.
    _zones: NamedTempFile,
}

#[allow(dead_code)]
impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("Service unreachable")
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// One GeoJSON zone feature.
pub fn zone_feature(id: &str, name: &str, state: &str, stations: &[&str]) -> Value {
    json!({
        "id": format!("https://api.weather.gov/zones/forecast/{}", id),
        "type": "Feature",
        "geometry": null,
        "properties": {
            "@id": format!("https://api.weather.gov/zones/forecast/{}", id),
            "id": id,
            "type": "public",
            "name": name,
            "state": state,
            "observationStations": stations,
        }
    })
}

/// The three-zone catalog used across tests; WAZ558 has no stations.
pub fn default_features() -> Vec<Value> {
    vec![
        zone_feature("WAZ315", "City of Seattle", "WA", &["https://api.weather.gov/stations/KSEA"]),
        zone_feature("WAZ558", "Olympic Mountains", "WA", &[]),
        zone_feature("ORZ006", "Greater Portland Metro Area", "OR", &["https://api.weather.gov/stations/KPDX"]),
    ]
}

pub fn write_zones(features: Vec<Value>) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let doc = json!({ "type": "FeatureCollection", "features": features });
    file.write_all(doc.to_string().as_bytes()).unwrap();
    file
}

/// Upstream forecast body with `n` periods.
#[allow(dead_code)]
pub fn forecast_body(n: u32) -> Value {
    let periods: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "number": i,
                "name": format!("Period {}", i),
                "detailedForecast": format!("Forecast text {}", i),
            })
        })
        .collect();
    json!({ "properties": { "updated": "2024-03-14T10:00:00+00:00", "periods": periods } })
}

/// Config pointing at `upstream`, with fast retries and no metrics listener.
pub fn test_config(upstream: &MockServer) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_address = upstream.uri();
    config.upstream.request_timeout_secs = 5;
    config.retries.base_delay_ms = 5;
    config.retries.max_delay_ms = 20;
    config.observability.metrics_enabled = false;
    config
}

/// Start the service on an ephemeral port.
pub async fn start_service(mut config: ServiceConfig, zones: NamedTempFile) -> TestService {
    let zones_path = zones.path().to_path_buf();
    config.catalog.zones_path = zones_path.to_string_lossy().into_owned();

    let diagnostics = Arc::new(NwsDiagnostics::new());
    let server = HttpServer::with_diagnostics(config, diagnostics.clone()).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestService {
        addr,
        shutdown,
        diagnostics,
        client,
        zones_path,
        _zones: zones,
    }
}
