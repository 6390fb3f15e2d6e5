//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the NWS subsystems from config and share them via `AppState`
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener until the shutdown signal fires

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::output_cache::OutputCache;
use crate::http::request::{make_request_span, MakeRequestUuid};
use crate::nws::{ClientBuildError, ForecastFetcher, MemoryCache, NwsClient, SimulatedFaults, ZoneCatalog};
use crate::observability::NwsDiagnostics;
use crate::resilience::RetryPolicy;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Client(#[from] ClientBuildError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub zones: Arc<ZoneCatalog>,
    pub forecasts: Arc<ForecastFetcher>,
    pub output_cache: Arc<OutputCache>,
    pub diagnostics: Arc<NwsDiagnostics>,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig, diagnostics: Arc<NwsDiagnostics>) -> Result<Self, ServerError> {
        let zones = ZoneCatalog::new(
            &config.catalog.zones_path,
            config.catalog.cache_ttl(),
            MemoryCache::new(16),
            diagnostics.clone(),
        );

        let client = NwsClient::new(&config.upstream, RetryPolicy::from_config(&config.retries))?;
        let forecasts = ForecastFetcher::new(
            client,
            diagnostics.clone(),
            SimulatedFaults::from_config(&config.faults),
        );

        Ok(Self {
            zones: Arc::new(zones),
            forecasts: Arc::new(forecasts),
            output_cache: Arc::new(OutputCache::new(&config.output_cache)),
            diagnostics,
        })
    }
}

/// HTTP server for the forecast API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    diagnostics: Arc<NwsDiagnostics>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        Self::with_diagnostics(config, Arc::new(NwsDiagnostics::new()))
    }

    /// Create a server that reports into an existing diagnostics registry.
    pub fn with_diagnostics(config: ServiceConfig, diagnostics: Arc<NwsDiagnostics>) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config, diagnostics.clone())?;
        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            diagnostics,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/zones", get(handlers::get_zones))
            .route("/forecast/{zone_id}", get(handlers::get_forecast))
            .route("/health", get(handlers::health))
            .route("/alive", get(handlers::alive))
            .route("/diagnostics", get(handlers::diagnostics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    // Wraps the timeout so its 408 carries the id too.
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> Arc<NwsDiagnostics> {
        self.diagnostics.clone()
    }

    /// Run the server, accepting connections on the given listener until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            zones_path = %self.config.catalog.zones_path,
            upstream = %self.config.upstream.base_address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
