//! CORS configuration for the HTTP surface.

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

/// Build the CORS layer from configured origins.
///
/// Without configured origins the layer stays wide open, which suits local
/// development. Configured origins get an explicit allow list scoped to the
/// GET/POST surface of the API.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<_> = settings
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
            .max_age(std::time::Duration::from_secs(3600))
    }
}
