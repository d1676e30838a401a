//! Public-key resolution and the process-wide key cache.
//!
//! # Purpose
//! Turns an instance-key header into a fetchable key URL, fetches the
//! PEM-encoded elliptic-curve public key over HTTPS, and memoizes decoded
//! keys by URL so repeated checks against the same signer skip the network.
//!
//! # Key invariants
//! - Cache entries are append-only and live for the process lifetime; key
//!   rotation at the distribution endpoint requires a restart to take effect.
//! - TLS verification on the fetch path cannot be disabled.
//! - A key is written to the store only after it decoded successfully, so an
//!   abandoned or failed fetch never leaves partial material behind.
//!
//! # Concurrency model
//! [`SharedKeyStore`] wraps a `DashMap` and is safe for concurrent
//! read/write from in-flight checks. Concurrent misses for the same URL may
//! each fetch; entries are idempotent per URL and the last write wins.
//!
//! # Security boundary
//! The fetch path is where trust in remote key material is established. The
//! URL is derived from as-yet-unverified header fields; the signature check
//! against the fetched key is what closes the loop, and a forged header can
//! only ever point at the trusted distribution host.
use crate::errors::{AuthError, AuthResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use serde_json::Value;
use std::time::Duration;

/// Default key-distribution endpoint; `{region}` is substituted from the
/// token's signer field.
pub const DEFAULT_KEY_BASE_URL: &str = "https://public-keys.auth.elb.{region}.amazonaws.com";

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Capability interface for the verification-key cache, injected into the
/// verifier so tests can substitute a fake store.
pub trait KeyStore: Send + Sync {
    fn get(&self, url: &str) -> Option<DecodingKey>;
    fn put(&self, url: &str, key: DecodingKey);
}

/// Concurrency-safe key cache keyed by resolved key URL. No TTL, no
/// eviction: staleness is traded for zero steady-state fetch load.
#[derive(Default)]
pub struct SharedKeyStore {
    keys: DashMap<String, DecodingKey>,
}

impl SharedKeyStore {
    pub fn new() -> Self {
        Self {
            keys: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyStore for SharedKeyStore {
    fn get(&self, url: &str) -> Option<DecodingKey> {
        self.keys.get(url).map(|entry| entry.value().clone())
    }

    fn put(&self, url: &str, key: DecodingKey) {
        self.keys.insert(url.to_string(), key);
    }
}

/// Derive the key URL from the token header.
///
/// The key identifier comes from the standard `kid` field; the region is the
/// fourth colon-delimited component of the non-standard `signer` field.
///
/// # Errors
/// - `MalformedHeader` if `kid` or `signer` is missing, `signer` is not a
///   string, or it has no usable region component.
pub fn resolve_key_url(
    base: &str,
    token: &str,
    header: &jsonwebtoken::Header,
) -> AuthResult<String> {
    let kid = header
        .kid
        .as_deref()
        .ok_or_else(|| AuthError::MalformedHeader("missing kid".to_string()))?;
    let raw = decode_raw_header(token)?;
    let signer = raw
        .get("signer")
        .and_then(|value| value.as_str())
        .ok_or_else(|| AuthError::MalformedHeader("missing signer".to_string()))?;
    let region = signer
        .split(':')
        .nth(3)
        .filter(|region| !region.is_empty())
        .ok_or_else(|| {
            AuthError::MalformedHeader(format!("signer {signer:?} has no region component"))
        })?;
    Ok(format!("{}/{}", base.replace("{region}", region), kid))
}

fn decode_raw_header(token: &str) -> AuthResult<Value> {
    // `signer` is not part of the standard JOSE header, so the first token
    // segment is decoded by hand.
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedHeader("header segment".to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| AuthError::MalformedHeader(format!("header json: {err}")))
}

/// HTTPS client for the key-distribution endpoint. One attempt per miss, no
/// retries; the TLS chain is always verified.
#[derive(Clone, Default)]
pub struct KeyFetcher {
    client: reqwest::Client,
}

impl KeyFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the raw PEM body from `url`.
    ///
    /// # Errors
    /// - `KeyFetchFailed` on transport errors, timeout, or a non-success
    ///   status.
    pub async fn fetch_pem(&self, url: &str) -> AuthResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(AuthError::KeyFetchFailed)?
            .error_for_status()
            .map_err(AuthError::KeyFetchFailed)?;
        let body = response.bytes().await.map_err(AuthError::KeyFetchFailed)?;
        Ok(body.to_vec())
    }
}

/// Decode PEM bytes into an elliptic-curve verification key.
///
/// # Errors
/// - `InvalidKeyFormat` if the bytes are not a parseable EC public key.
pub fn decode_public_key(pem: &[u8]) -> AuthResult<DecodingKey> {
    DecodingKey::from_ec_pem(pem).map_err(AuthError::InvalidKeyFormat)
}
