//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Identity**: Opaque provider-assigned player identifier

mod identity;

pub use identity::*;
