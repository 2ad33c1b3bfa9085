//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - TTL store implementations (Redis)
//! - Identity provider clients (Facebook Graph)
//! - Prometheus metrics

pub mod database;
pub mod identity;
pub mod metrics;
pub mod repositories;
pub mod store;
