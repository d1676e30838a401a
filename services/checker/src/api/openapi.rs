//! OpenAPI schema aggregation for the checker API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! docs and client generation.
use crate::api::{
    check, system,
    types::{
        AdapterParams, CheckOutput, CheckRequest, CheckResponse, Decision, ErrorResponse,
        HealthStatus, SystemInfo,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "userkey-checker",
        version = "v1",
        description = "Instance-key authorization check API"
    ),
    paths(check::check, system::system_info, system::system_health),
    components(schemas(
        CheckRequest,
        CheckResponse,
        CheckOutput,
        Decision,
        AdapterParams,
        ErrorResponse,
        SystemInfo,
        HealthStatus
    )),
    tags(
        (name = "check", description = "Instance-key authorization checks"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;
