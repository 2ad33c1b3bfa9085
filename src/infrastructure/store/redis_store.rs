//! Redis-backed TTL store.
//!
//! Uses a Redis ConnectionManager for efficient connection pooling and
//! automatic reconnection handling. Every Redis failure surfaces as
//! [`StoreError::Unavailable`]; an absent key is `Ok(None)`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::ttl_store::{StoreError, TtlStore};

/// Redis implementation of [`TtlStore`].
#[derive(Clone)]
pub struct RedisTtlStore {
    /// Redis connection manager with automatic reconnection
    conn: ConnectionManager,
    /// Optional key prefix for namespacing
    prefix: Option<Arc<str>>,
}

impl RedisTtlStore {
    /// Creates a new store over an established connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn, prefix: None }
    }

    /// Creates a new store with a key prefix.
    ///
    /// All keys will be automatically prefixed, useful for sharing one Redis
    /// instance across deployments.
    pub fn with_prefix(conn: ConnectionManager, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            conn,
            prefix: Some(prefix.into()),
        }
    }

    /// Formats a key with the optional prefix.
    fn format_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl TtlStore for RedisTtlStore {
    #[instrument(skip(self, value), level = "debug")]
    async fn set_ex(&self, key: &str, value: &str, seconds: u64) -> Result<(), StoreError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let _: () = conn.set_ex(&full_key, value, seconds).await?;
        debug!(key = %full_key, ttl = seconds, "Store set with expiry");

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&full_key).await?;
        debug!(key = %full_key, hit = result.is_some(), "Store get");

        Ok(result)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let deleted: u64 = conn.del(&full_key).await?;
        let existed = deleted > 0;
        debug!(key = %full_key, deleted = existed, "Store delete");

        Ok(existed)
    }

    #[instrument(skip(self), level = "debug")]
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisTtlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTtlStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
