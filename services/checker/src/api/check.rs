//! Instance-key check endpoint.
//!
//! # Purpose and responsibility
//! The top-level decision state machine: sentinel handling, verification,
//! claim evaluation, and folding every pipeline error into a deny decision.
//!
//! # Key invariants and assumptions
//! - The service always answers with a decision; the only call-level error
//!   is a malformed adapter configuration, which no policy can be evaluated
//!   without.
//! - No verification or claim error ever surfaces as a transport fault.
//!
//! # Security considerations
//! - Fail-closed: any ambiguity in the pipeline is a `PERMISSION_DENIED`.
//! - Deny responses carry a stable reason code but no token contents.
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{AdapterParams, CheckRequest, CheckResponse, ErrorResponse};
use crate::app::AppState;
use crate::config::UnknownKeyPolicy;
use axum::Json;
use axum::extract::State;

/// Sentinel instance key meaning "no token present on the request".
pub(crate) const UNKNOWN_INSTANCE_KEY: &str = "unknown";

#[utoipa::path(
    post,
    path = "/v1/check",
    tag = "check",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Check decision", body = CheckResponse),
        (status = 400, description = "Malformed adapter configuration", body = ErrorResponse)
    )
)]
/// Verify an instance key and return an allow/deny decision.
///
/// # What it does
/// Parses the adapter configuration, short-circuits the sentinel key per the
/// configured policy, and otherwise runs verification plus claim evaluation.
///
/// # Why it exists
/// This is the single call boundary of the service; callers cache the
/// decision for `valid_duration_secs`.
///
/// # Errors
/// - Returns 400 only when the adapter configuration cannot be parsed.
pub(crate) async fn check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    // Step 1: The adapter config is the one hard precondition; without a
    // validity duration no decision policy can be evaluated.
    let params: AdapterParams = serde_json::from_value(request.adapter_config)
        .map_err(|err| api_validation_error(&format!("adapter config: {err}")))?;

    // Step 2: Sentinel keys never reach the verifier; policy decides whether
    // they pass through without an opinion or are denied outright.
    if request.instance_key == UNKNOWN_INSTANCE_KEY {
        tracing::warn!("skipping unknown instance key");
        let response = match state.unknown_key_policy {
            UnknownKeyPolicy::Passthrough => {
                record_decision("passthrough");
                CheckResponse::passthrough(params.valid_duration_secs)
            }
            UnknownKeyPolicy::Deny => {
                record_decision("deny");
                CheckResponse::denied("unknown_instance_key")
            }
        };
        return Ok(Json(response));
    }

    // Step 3: Verify and evaluate; every pipeline error folds into a deny.
    match state.auth.authenticate(&request.instance_key).await {
        Ok(email) => {
            tracing::info!(email = %email, "instance key allowed");
            record_decision("allow");
            Ok(Json(CheckResponse::allowed(
                email,
                params.valid_duration_secs,
            )))
        }
        Err(err) => {
            tracing::warn!(error = %err, reason = err.code(), "instance key denied");
            record_decision("deny");
            Ok(Json(CheckResponse::denied(err.code())))
        }
    }
}

fn record_decision(outcome: &'static str) {
    metrics::counter!("userkey_checks_total", "decision" => outcome).increment(1);
}
