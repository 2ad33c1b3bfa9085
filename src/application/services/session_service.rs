//! Session Credential Authority
//!
//! Issues, validates, and revokes opaque session tokens. This service is the
//! sole authority for "is this token currently valid, and for whom".
//!
//! Tokens are 128-bit random hex strings. The store key is a SHA-256 hash of
//! the token, so a leaked store dump cannot be replayed as bearer
//! credentials. Entries expire via the store TTL and the record's own
//! `expires_at`, whichever trips first.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{Identity, SessionRecord};
use crate::infrastructure::store::{keys, StoreError, TtlStore};

/// Token entropy in bytes (128 bits).
pub const TOKEN_BYTES: usize = 16;

/// Session validation/issuance errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Token absent, expired, or never issued. Deliberately one variant:
    /// callers cannot tell those cases apart.
    #[error("Invalid or expired session token")]
    Invalid,

    /// The backing store could not answer; distinct from `Invalid` so
    /// callers can treat it as transient.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A freshly issued session token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    /// Opaque bearer token; shown to the client exactly once
    pub token: String,

    /// Seconds until the token expires
    pub expires_in: u64,
}

/// Issues and validates session tokens against a [`TtlStore`].
pub struct SessionAuthority {
    store: Arc<dyn TtlStore>,
    session_ttl_secs: u64,
}

impl SessionAuthority {
    /// Create an authority issuing tokens valid for `session_ttl_secs`.
    pub fn new(store: Arc<dyn TtlStore>, session_ttl_secs: u64) -> Self {
        Self {
            store,
            session_ttl_secs,
        }
    }

    /// Issue a new token bound to `identity`.
    ///
    /// Concurrent issues never collide: 128 bits of CSPRNG output make the
    /// probability negligible by construction, no uniqueness check needed.
    /// An identity may hold any number of live tokens (multi-device).
    pub async fn issue(&self, identity: &Identity) -> Result<IssuedSession, SessionError> {
        let token = generate_token();
        let record = SessionRecord::new(identity.clone(), self.session_ttl_secs);

        let data = serde_json::to_string(&record)
            .map_err(|e| SessionError::Internal(format!("Session serialization failed: {}", e)))?;

        self.store
            .set_ex(&keys::session(hash_token(&token)), &data, self.session_ttl_secs)
            .await?;

        debug!(identity = %identity, ttl = self.session_ttl_secs, "Session issued");

        Ok(IssuedSession {
            token,
            expires_in: self.session_ttl_secs,
        })
    }

    /// Resolve a token to its bound identity.
    ///
    /// Expired-but-present and never-issued both return [`SessionError::Invalid`];
    /// validation leaks nothing about whether a token ever existed. Tokens are
    /// not single-use: validation does not consume them.
    pub async fn validate(&self, token: &str) -> Result<Identity, SessionError> {
        let data = self
            .store
            .get(&keys::session(hash_token(token)))
            .await?
            .ok_or(SessionError::Invalid)?;

        let record: SessionRecord = serde_json::from_str(&data)
            .map_err(|e| SessionError::Internal(format!("Session deserialization failed: {}", e)))?;

        // The store evicts by TTL; this covers the window between logical
        // expiry and eviction.
        if record.is_expired() {
            return Err(SessionError::Invalid);
        }

        Ok(record.identity)
    }

    /// Revoke a token immediately (explicit logout).
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let existed = self
            .store
            .delete(&keys::session(hash_token(token)))
            .await?;

        if !existed {
            return Err(SessionError::Invalid);
        }

        debug!("Session revoked");
        Ok(())
    }

    /// Probe the backing store for readiness checks.
    pub async fn ping_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

/// Generate a fresh token: 16 CSPRNG bytes as lowercase hex.
fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hash a token for use as a store key.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
