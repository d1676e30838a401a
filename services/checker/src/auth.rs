use std::sync::Arc;
use userkey_authz::{AuthError, InstanceKeyVerifier, SharedKeyStore, evaluate};

/// Composite authenticator: verify the instance key, then apply the identity
/// claim policy. Owns the process-wide key store.
#[derive(Clone)]
pub struct CheckerAuth {
    verifier: Arc<InstanceKeyVerifier>,
}

impl CheckerAuth {
    pub fn new(key_base_url: impl Into<String>, clock_skew_secs: u64) -> Self {
        let key_store = Arc::new(SharedKeyStore::new());
        let verifier = Arc::new(InstanceKeyVerifier::new(
            key_base_url,
            clock_skew_secs,
            key_store,
        ));
        Self { verifier }
    }

    /// Returns the verified email on success; any pipeline error means deny.
    pub async fn authenticate(&self, instance_key: &str) -> Result<String, AuthError> {
        let claims = self.verifier.verify(instance_key).await?;
        evaluate(&claims)
    }
}
