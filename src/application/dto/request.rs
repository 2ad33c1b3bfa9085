//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;

/// Authentication request carrying the external provider credential.
///
/// The field is optional at the serde level so that an absent credential
/// reaches the handler and maps to the `missing_credential` error kind
/// instead of a framework-level deserialization reject.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub credential: Option<String>,
}

impl AuthRequest {
    /// The credential, treating an empty string the same as an absent field.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|c| !c.is_empty())
    }
}
