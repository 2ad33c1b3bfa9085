//! Identity verification seam.
//!
//! The verifier performs exactly one outbound call to the external identity
//! provider per credential. It never retries (callers own retry policy) and
//! never caches results; a credential is single-use from its perspective.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_objects::Identity;

/// Outcome of a successful credential verification.
///
/// Display fields are best-effort; providers are not required to return them
/// and profile provisioning falls back to defaults when they are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    /// Provider-assigned subject
    pub identity: Identity,

    /// Display name as reported by the provider
    pub display_name: Option<String>,

    /// Avatar URL as reported by the provider
    pub avatar_url: Option<String>,
}

/// Why a credential could not be verified.
///
/// The causes are distinct for logging and diagnostics but all terminate the
/// authentication attempt the same way.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Network(String),

    /// The provider answered with something we could not interpret.
    #[error("malformed identity provider response: {0}")]
    InvalidResponse(String),

    /// The provider answered and rejected the credential.
    #[error("credential rejected by identity provider: {0}")]
    Rejected(String),
}

/// Contract for external credential verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a user-supplied provider credential.
    ///
    /// One outbound call; network failure, malformed responses, and provider
    /// rejection surface as the corresponding [`VerificationError`] variant.
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerificationError>;
}
