use actix_web::{web, HttpServer};
use anyhow::Context;
use env_logger::Env;

use tk_api::{create_app, AppState};
use tk_infra::build_verification_service;
use tk_shared::config::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    log::info!(
        "Starting Trinck OTP API ({:?}) on {}",
        config.environment,
        config.server.bind_address()
    );

    let verification = build_verification_service(&config)
        .await
        .context("Failed to initialize verification service")?;

    let app_state = web::Data::new(AppState::new(verification.clone()));
    let app_config = config.clone();

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?
        .run()
        .await?;

    verification
        .dispose()
        .await
        .context("Failed to dispose verification service")?;
    log::info!("Server stopped");

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let mut builder = env_logger::Builder::from_env(Env::new().default_filter_or(logging.level.as_str()));
    match logging.format {
        LogFormat::Pretty => builder.format_timestamp_millis(),
        LogFormat::Compact => builder.format_timestamp_secs().format_target(false),
    };
    builder.init();
}
