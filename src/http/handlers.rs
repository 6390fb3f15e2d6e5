//! Endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::output_cache::ForecastList;
use crate::http::server::AppState;
use crate::nws::ZoneList;
use crate::observability::DiagnosticsSnapshot;

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Forecast not found").into_response(),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
        }
    }
}

pub async fn get_zones(State(state): State<AppState>) -> Json<ZoneList> {
    let zones = state.output_cache.zones(state.zones.get_zones()).await;
    Json(zones)
}

/// Any upstream or injected failure is reported as 404.
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(zone_id): Path<String>,
) -> Result<Json<ForecastList>, ApiError> {
    let result = state
        .output_cache
        .forecast(&zone_id, state.forecasts.get_forecast_by_zone(&zone_id))
        .await;

    match result {
        Ok(forecasts) => Ok(Json(forecasts)),
        Err(e) if e.is_remote() => {
            tracing::debug!(zone_id = %zone_id, error = %e, "Forecast unavailable");
            Err(ApiError::NotFound)
        }
        Err(_) => Err(ApiError::BadRequest("zone id must not be empty")),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub zone_catalog: &'static str,
}

/// Readiness: the zone document must be reachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    match tokio::fs::metadata(state.zones.path()).await {
        Ok(meta) if meta.is_file() => (
            StatusCode::OK,
            Json(HealthReport {
                status: "Healthy",
                zone_catalog: "Healthy",
            }),
        ),
        _ => {
            tracing::warn!(path = %state.zones.path().display(), "Zone document not readable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: "Unhealthy",
                    zone_catalog: "Unhealthy",
                }),
            )
        }
    }
}

/// Liveness: the process is serving requests.
pub async fn alive() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Healthy" }))
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub version: &'static str,
    #[serde(flatten)]
    pub counters: DiagnosticsSnapshot,
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    Json(DiagnosticsReport {
        version: env!("CARGO_PKG_VERSION"),
        counters: state.diagnostics.snapshot(),
    })
}
