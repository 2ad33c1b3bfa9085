//! # Domain Services
//!
//! Domain services encapsulate business contracts that don't naturally belong
//! to a single entity.
//!
//! ## Services
//!
//! - **IdentityVerifier**: Contract for verifying external provider
//!   credentials

mod verifier;

pub use verifier::*;
