//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes for the check endpoint and system probes, plus
//! OpenAPI schema generation.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CheckRequest {
    /// The bearer token to verify, or the sentinel `unknown` when the
    /// request carried no token.
    pub instance_key: String,
    /// Opaque adapter configuration; only `valid_duration_secs` is consumed.
    #[schema(value_type = Object)]
    pub adapter_config: serde_json::Value,
}

/// Typed view of the adapter configuration blob.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AdapterParams {
    pub valid_duration_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    PermissionDenied,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CheckOutput {
    pub email: String,
}

/// Check decision. A pass-through response carries no status at all; a deny
/// carries no validity duration or output.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CheckResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckOutput>,
}

impl CheckResponse {
    pub fn allowed(email: String, valid_duration_secs: u64) -> Self {
        Self {
            status: Some(Decision::Allow),
            reason: None,
            valid_duration_secs: Some(valid_duration_secs),
            output: Some(CheckOutput { email }),
        }
    }

    pub fn denied(reason: &str) -> Self {
        Self {
            status: Some(Decision::PermissionDenied),
            reason: Some(reason.to_string()),
            valid_duration_secs: None,
            output: None,
        }
    }

    pub fn passthrough(valid_duration_secs: u64) -> Self {
        Self {
            status: None,
            reason: None,
            valid_duration_secs: Some(valid_duration_secs),
            output: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub api_version: String,
    pub unknown_key_policy: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}
