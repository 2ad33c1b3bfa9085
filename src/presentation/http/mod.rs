//! HTTP Presentation Layer
//!
//! REST endpoints, route configuration, and extractors.

pub mod extractors;
pub mod handlers;
pub mod routes;
