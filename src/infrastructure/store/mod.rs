//! Session Store Module
//!
//! Redis connection management and the TTL key-value abstraction backing
//! session tokens.
//!
//! This module provides:
//! - A `TtlStore` trait for TTL-bound key-value operations
//! - A `RedisTtlStore` implementation with automatic reconnection
//! - An `InMemoryTtlStore` for tests and single-node development
//! - Predefined key prefixes for consistent key naming
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! | SessionAuthority  |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! |  TtlStore Trait   |  <-- Abstract interface
//! +-------------------+
//!        |       |
//!        v       v
//! +-----------+ +------------------+
//! | RedisTtl  | | InMemoryTtlStore |
//! | Store     | | (tests/dev)      |
//! +-----------+ +------------------+
//! ```

mod memory;
mod redis_store;
mod ttl_store;

pub use memory::InMemoryTtlStore;
pub use redis_store::RedisTtlStore;
pub use ttl_store::{StoreError, TtlStore};

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
///
/// The connection manager handles connection pooling and automatic
/// reconnection when the connection is lost.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Creates a `RedisTtlStore` from configuration settings, applying the
/// configured key prefix when present.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_store(
    settings: &RedisSettings,
) -> Result<RedisTtlStore, redis::RedisError> {
    let conn = create_redis_client(settings).await?;
    Ok(match &settings.key_prefix {
        Some(prefix) => RedisTtlStore::with_prefix(conn, prefix.as_str()),
        None => RedisTtlStore::new(conn),
    })
}

/// Store key prefixes.
///
/// Use these constants to ensure consistent key naming across the application.
pub mod keys {
    /// Prefix for session token bindings (e.g., "session:<token hash>")
    pub const SESSION: &str = "session:";

    /// Generates a session key from a token hash
    #[inline]
    pub fn session(token_hash: impl std::fmt::Display) -> String {
        format!("{}{}", SESSION, token_hash)
    }
}
