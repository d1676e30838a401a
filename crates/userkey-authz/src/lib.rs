//! Instance-key verification primitives for the userkey checker service.
//!
//! # Purpose
//! Centralizes the token-verification pipeline: ECDSA algorithm enforcement,
//! dynamic public-key resolution with a process-wide cache, and the identity
//! claim policy (email presence, optional binding `email_verified` flag).
//!
//! # How it fits
//! The checker service composes [`InstanceKeyVerifier`] and [`evaluate`]
//! into a single allow/deny decision per inbound check; everything in this
//! crate fails closed by returning a typed [`AuthError`].
//!
//! # Key invariants
//! - Only ES256/ES384/ES512 instance keys are accepted; all other declared
//!   algorithms are rejected before any key material is used.
//! - Cache entries are append-only per key URL and never expire; key
//!   rotation at the distribution endpoint requires a process restart.
//! - TLS verification on the key-fetch path is not configurable.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use userkey_authz::{DEFAULT_KEY_BASE_URL, InstanceKeyVerifier, SharedKeyStore};
//!
//! let store = Arc::new(SharedKeyStore::new());
//! let verifier = InstanceKeyVerifier::new(DEFAULT_KEY_BASE_URL, 60, store);
//! let _ = verifier;
//! ```
//!
//! # Common pitfalls
//! - Treating a claim-evaluation error as anything but a deny; the caller
//!   must map every [`AuthError`] to a denied decision.
//! - Sharing a fresh store per request; the cache only pays off when one
//!   store lives for the whole process.

mod claims;
mod errors;
mod keys;
mod verifier;

pub use claims::{ClaimSet, evaluate};
pub use errors::{AuthError, AuthResult};
pub use keys::{
    DEFAULT_KEY_BASE_URL, KeyFetcher, KeyStore, SharedKeyStore, decode_public_key,
    resolve_key_url,
};
pub use verifier::InstanceKeyVerifier;
