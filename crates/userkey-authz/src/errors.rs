use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed instance key: {0}")]
    MalformedToken(jsonwebtoken::errors::Error),
    #[error("unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),
    #[error("malformed token header: {0}")]
    MalformedHeader(String),
    #[error("key fetch failed: {0}")]
    KeyFetchFailed(reqwest::Error),
    #[error("invalid public key format: {0}")]
    InvalidKeyFormat(jsonwebtoken::errors::Error),
    #[error("token verification failed: {0}")]
    VerificationFailed(jsonwebtoken::errors::Error),
    #[error("email claim missing")]
    MissingIdentityClaim,
    #[error("malformed claim: {0}")]
    MalformedClaim(String),
    #[error("email is not verified")]
    EmailNotVerified,
}

impl AuthError {
    /// Stable machine-readable code, used as the deny reason at the service
    /// boundary.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AuthError::MalformedHeader(_) => "malformed_header",
            AuthError::KeyFetchFailed(_) => "key_fetch_failed",
            AuthError::InvalidKeyFormat(_) => "invalid_key_format",
            AuthError::VerificationFailed(_) => "verification_failed",
            AuthError::MissingIdentityClaim => "missing_identity_claim",
            AuthError::MalformedClaim(_) => "malformed_claim",
            AuthError::EmailNotVerified => "email_not_verified",
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
