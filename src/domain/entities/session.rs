//! Session record entity.
//!
//! The value stored against a session token in the TTL store. The store key
//! is a SHA-256 hash of the token (never store raw tokens); the record binds
//! that token to exactly one verified identity for a bounded window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Identity;

/// Identity binding for one issued session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Verified identity this token was issued to
    pub identity: Identity,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// Hard expiry; the token never validates past this instant
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a record expiring `ttl_secs` from now.
    ///
    /// A TTL beyond the calendar range saturates to the far future; it never
    /// wraps into an already-expired window.
    pub fn new(identity: Identity, ttl_secs: u64) -> Self {
        let issued_at = Utc::now();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(ttl)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            identity,
            issued_at,
            expires_at,
        }
    }

    /// Check whether the record's validity window has elapsed.
    ///
    /// The backing store also expires entries by TTL; this check covers the
    /// window between logical expiry and store eviction.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
