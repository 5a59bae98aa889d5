//! Configuration and dependency initialization for the API service.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{DiscordSettings, Secret, Settings, StorageBackend};

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Create the CORS layer for the configured frontend origins.
///
/// Credentials are allowed, so methods and headers are listed explicitly.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}
