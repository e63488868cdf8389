//! Wiring of the verification service from application configuration

use std::sync::Arc;
use tracing::info;

use tk_core::{
    DeepLinkBuilder, DeliveryChain, SystemClock, VerificationService, VerificationServiceConfig,
};
use tk_shared::config::{AppConfig, DeliveryConfig};

use crate::delivery::{
    CarrierGatewayChannel, CarrierTable, EmailRelayChannel, HttpSmsChannel,
    InMemoryContactDirectory,
};
use crate::mail::{Mailer, SmtpMailer};
use crate::store::InMemorySessionStore;
use crate::InfrastructureError;

/// Verification service as deployed: in-memory store, wall clock
pub type AppVerificationService = VerificationService<InMemorySessionStore, SystemClock>;

/// Build the delivery chain with the SMTP mailer from configuration
pub fn build_delivery_chain(config: &DeliveryConfig) -> Result<DeliveryChain, InfrastructureError> {
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.smtp)?);
    build_delivery_chain_with_mailer(config, mailer)
}

/// Build the delivery chain around a given mailer
///
/// Channel order: HTTP SMS (when an API key is set), carrier gateway, email
/// relay. The deep link is added by the chain itself.
pub fn build_delivery_chain_with_mailer(
    config: &DeliveryConfig,
    mailer: Arc<dyn Mailer>,
) -> Result<DeliveryChain, InfrastructureError> {
    let country_code = config.deep_link.default_country_code.clone();
    let directory = InMemoryContactDirectory::from_config(&config.registered_contacts)?;

    let mut chain = DeliveryChain::new(DeepLinkBuilder::from_config(&config.deep_link), &config.brand_name)
        .with_directory(Arc::new(directory));

    if config.http_sms.is_configured() {
        chain = chain.with_channel(Arc::new(HttpSmsChannel::new(&config.http_sms, country_code.clone())?));
    }

    if config.carrier_gateway_enabled {
        chain = chain.with_channel(Arc::new(CarrierGatewayChannel::new(
            CarrierTable::new(country_code),
            mailer.clone(),
        )));
    }

    if config.email_relay_enabled {
        chain = chain.with_channel(Arc::new(EmailRelayChannel::new(mailer)));
    }

    info!(
        channels = ?chain.channel_names(),
        registered_contacts = config.registered_contacts.len(),
        "Delivery chain ready"
    );

    Ok(chain)
}

/// Build and initialize the verification service
pub async fn build_verification_service(
    config: &AppConfig,
) -> Result<Arc<AppVerificationService>, InfrastructureError> {
    let chain = build_delivery_chain(&config.delivery)?;

    let service = VerificationService::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(SystemClock),
        Arc::new(chain),
        VerificationServiceConfig::from_settings(&config.otp, config.environment),
    );
    service.init().await?;

    Ok(Arc::new(service))
}
