//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **SessionAuthority**: Session token issuance, validation, and revocation
//! - **AuthService**: End-to-end credential authentication flow

pub mod auth_service;
pub mod session_service;

// Re-export auth service types
pub use auth_service::{AuthError, AuthService, AuthenticatedPlayer};

// Re-export session authority types
pub use session_service::{IssuedSession, SessionAuthority, SessionError, TOKEN_BYTES};
