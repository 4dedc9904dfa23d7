//! Health Check and Metrics Handlers
//!
//! - `GET /health` - JSON status
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `GET /readyz` - Readiness probe
//! - `GET /metrics` - Prometheus metrics in text format

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::controller::AppState;
use crate::infrastructure::metrics::get_metrics_handle;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded".
    pub status: HealthStatus,
    /// Server version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Property lookup status.
    pub property_lookup: LookupStatus,
    /// Scenario persistence status.
    pub scenario: ScenarioStatus,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All features available.
    Healthy,
    /// Running without an optional feature.
    Degraded,
}

/// Property lookup status.
#[derive(Debug, Clone, Serialize)]
pub struct LookupStatus {
    /// Whether a provider is configured.
    pub configured: bool,
    /// Records held in the cache.
    pub cached_records: usize,
}

/// Scenario persistence status.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioStatus {
    /// Whether the latest change is still waiting to be saved.
    pub pending_save: bool,
}

pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(build_health_response(&state)))
}

pub(super) async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub(super) async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.cancel.is_cancelled() {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    } else {
        (StatusCode::OK, "READY")
    }
}

pub(super) async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let property_lookup = LookupStatus {
        configured: state.property_lookup.is_some(),
        cached_records: state
            .property_lookup
            .as_ref()
            .map_or(0, |service| service.cached_records()),
    };

    let status = if property_lookup.configured {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        property_lookup,
        scenario: ScenarioStatus {
            pending_save: state.workspace.has_pending_changes(),
        },
    }
}
