//! System/health API handlers.
//!
//! # Purpose and responsibility
//! Lightweight endpoints for service metadata and health checks, used by
//! probes and automation.
//!
//! # Key invariants and assumptions
//! - Health checks must be fast and side-effect free; the checker holds no
//!   backing store to probe.
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity and policy", body = SystemInfo)
    )
)]
/// Return service identity and the active sentinel-key policy.
///
/// # Errors
/// - Does not return errors.
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        api_version: state.api_version.clone(),
        unknown_key_policy: state.unknown_key_policy.as_str().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Checker health", body = HealthStatus)
    )
)]
/// Return checker health status.
///
/// # Errors
/// - Does not return errors.
pub(crate) async fn system_health() -> Json<HealthStatus> {
    // The checker is healthy whenever it can answer; the key cache needs no
    // probing.
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
