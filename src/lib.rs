//! # Dicehall Library
//!
//! This crate provides a session-gated multiplayer room server with:
//! - External identity verification and session token issuance
//! - WebSocket gateway for real-time room events
//! - PostgreSQL for player profiles
//! - Redis for TTL-bound session storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and trait seams
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, session store, and provider implementations
//! - **Presentation Layer**: HTTP handlers and WebSocket gateway
//!
//! ## Module Structure
//!
//! ```text
//! dicehall/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database, store, and provider implementations
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
