//! TTL Store Abstraction
//!
//! A minimal TTL-capable key-value contract for session storage. Every value
//! is written with an expiry; after the TTL elapses the key reads as absent.
//!
//! The trait is object-safe on purpose: callers hold `Arc<dyn TtlStore>` so
//! the session logic works identically against Redis or the in-memory store
//! used in tests, without the connection gate knowing which one is wired.

use async_trait::async_trait;
use thiserror::Error;

/// Store-level failure.
///
/// Distinct from "key absent": callers must be able to tell "definitely not
/// stored" (`Ok(None)`) apart from "cannot currently tell" (`Err`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// TTL-bound key-value store contract.
#[async_trait]
pub trait TtlStore: Send + Sync {
    /// Store `value` under `key`, expiring after `seconds`.
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), StoreError>;

    /// Fetch the value under `key`; `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key` immediately. Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
