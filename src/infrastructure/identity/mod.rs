//! Identity provider integrations.

pub mod facebook;

pub use facebook::FacebookVerifier;
