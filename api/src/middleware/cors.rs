//! CORS configuration for the browser client.
//!
//! Development allows any origin so the UI can be served from a local dev
//! server. Elsewhere only the configured origins are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use tk_shared::config::{Environment, ServerConfig};

const MAX_AGE_SECS: usize = 3600;

/// Creates a CORS middleware instance for the given environment
pub fn create_cors(environment: Environment, server: &ServerConfig) -> Cors {
    if environment.is_development() {
        create_development_cors()
    } else {
        create_restricted_cors(&server.allowed_origins)
    }
}

fn create_development_cors() -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(MAX_AGE_SECS)
}

fn create_restricted_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(MAX_AGE_SECS);

    for origin in allowed_origins.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    if allowed_origins.is_empty() {
        log::warn!("No CORS origins configured; cross-origin requests will be rejected");
    }

    cors
}
