//! Application state and factory
//!
//! This module holds the shared application state and builds the
//! Actix-web application around it.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use tk_core::{Clock, SessionStore, VerificationService};
use tk_shared::config::AppConfig;
use tk_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes::otp;

/// Application state shared by all handlers
pub struct AppState<S, C>
where
    S: SessionStore,
    C: Clock,
{
    pub verification: Arc<VerificationService<S, C>>,
}

impl<S: SessionStore, C: Clock> AppState<S, C> {
    pub fn new(verification: Arc<VerificationService<S, C>>) -> Self {
        Self { verification }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<S, C>(
    app_state: web::Data<AppState<S, C>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: SessionStore + 'static,
    C: Clock + 'static,
{
    let cors = create_cors(config.environment, &config.server);

    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(config.server.max_payload_size)
                .error_handler(json_error_handler),
        )
        .wrap(Logger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(web::scope("/otp").configure(otp::configure::<S, C>))
                .route("/", web::get().to(api_documentation)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "trinck-otp-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Trinck OTP API v1",
        "endpoints": {
            "health": "/health",
            "otp": {
                "send": { "path": "/api/v1/otp/send", "method": "POST" },
                "verify": { "path": "/api/v1/otp/verify", "method": "POST" },
                "resend": { "path": "/api/v1/otp/resend", "method": "POST" },
                "session": { "path": "/api/v1/otp/sessions/{session_id}", "method": "GET" },
            }
        }
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
