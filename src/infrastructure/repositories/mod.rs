//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer.
//!
//! ## Available Repositories
//!
//! - **PlayerRepository** - Player profile lookup and first-sight provisioning
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::PgPlayerRepository;
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let player_repo = PgPlayerRepository::new(pool);
//! }
//! ```

pub mod player_repository;

// Re-export repository structs for convenience
pub use player_repository::PgPlayerRepository;
