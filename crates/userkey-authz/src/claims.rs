//! Claim-policy evaluation for verified instance keys.
//!
//! # Purpose
//! Inspects the decoded claim set of an already-verified token and decides
//! allow/deny: the `email` claim must be present (and a string), and the
//! optional `email_verified` flag is binding when it exists.
//!
//! # Key invariants
//! - Claim values are heterogeneous (string/bool/number); anything that does
//!   not resolve cleanly to "verified" counts as not verified.
//! - An unparseable `email_verified` value is logged and treated as false,
//!   never surfaced as its own error.
use crate::errors::{AuthError, AuthResult};
use serde_json::{Map, Value};

/// Decoded claim set of a verified instance key.
pub type ClaimSet = Map<String, Value>;

/// Apply the identity claim policy and extract the subject email.
///
/// # Errors
/// - `MissingIdentityClaim` if there is no `email` claim.
/// - `MalformedClaim` if the `email` claim is not a string.
/// - `EmailNotVerified` if `email_verified` is present and resolves to false.
pub fn evaluate(claims: &ClaimSet) -> AuthResult<String> {
    let email = match claims.get("email") {
        None => return Err(AuthError::MissingIdentityClaim),
        Some(Value::String(email)) => email.clone(),
        Some(_) => {
            return Err(AuthError::MalformedClaim(
                "email claim is not a string".to_string(),
            ));
        }
    };

    // The flag is optional, but binding when present.
    if let Some(flag) = claims.get("email_verified")
        && !email_verified(flag)
    {
        return Err(AuthError::EmailNotVerified);
    }

    Ok(email)
}

fn email_verified(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(raw) => match raw.parse::<bool>() {
            Ok(flag) => flag,
            Err(_) => {
                tracing::warn!(raw = %raw, "email_verified does not parse as a bool");
                false
            }
        },
        other => {
            tracing::warn!(value = ?other, "email_verified has an unexpected type");
            false
        }
    }
}
