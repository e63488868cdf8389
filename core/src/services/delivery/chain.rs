//! Ordered fallback across delivery channels

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::verification_session::SubjectKind;

use super::deep_link::DeepLinkBuilder;
use super::traits::{ContactDirectory, DeliveryChannel};
use super::types::{
    DeliveryOutcome, DeliveryReport, DeliveryRequest, OutboundCode, RegisteredContact,
};

/// Delivery chain that tries each channel in order until one succeeds
///
/// Channel failures are logged and swallowed: delivery is best effort and
/// never fails the issuance that triggered it.
pub struct DeliveryChain {
    channels: Vec<Arc<dyn DeliveryChannel>>,
    directory: Option<Arc<dyn ContactDirectory>>,
    deep_link: DeepLinkBuilder,
    brand_name: String,
}

impl DeliveryChain {
    /// Create a chain with no channels; only the deep link is produced
    pub fn new(deep_link: DeepLinkBuilder, brand_name: impl Into<String>) -> Self {
        Self {
            channels: Vec::new(),
            directory: None,
            deep_link,
            brand_name: brand_name.into(),
        }
    }

    /// Append a channel to the end of the chain
    pub fn with_channel(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        info!(channel = channel.name(), "Registered delivery channel");
        self.channels.push(channel);
        self
    }

    /// Use a contact directory to resolve registered phones and emails
    pub fn with_directory(mut self, directory: Arc<dyn ContactDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Channel names in the order they are tried
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn compose_message(&self, code: &str, expires_in_minutes: i64) -> String {
        format!(
            "Your {} verification code is: {}. Valid for {} minutes. Do not share this code.",
            self.brand_name, code, expires_in_minutes
        )
    }

    pub fn compose_subject(&self) -> String {
        format!("{} Verification Code", self.brand_name)
    }

    /// Run the chain for a freshly issued code
    pub async fn deliver(&self, request: &DeliveryRequest) -> DeliveryReport {
        let masked = request.subject_kind.mask(&request.subject_value);
        let contact = self.resolve_contact(request).await;

        let recipient_phone = match request.subject_kind {
            SubjectKind::Phone => Some(request.subject_value.clone()),
            SubjectKind::IdentityDocument => contact.phone.clone(),
        };

        let outbound = OutboundCode {
            subject_kind: request.subject_kind,
            code: request.code.clone(),
            recipient_phone,
            recipient_email: contact.email,
            message: self.compose_message(&request.code, request.expires_in_minutes),
            subject_line: self.compose_subject(),
        };

        let mut outcome = DeliveryOutcome::DeferredToUser;
        for channel in &self.channels {
            match channel.deliver(&outbound).await {
                Ok(receipt) => {
                    info!(
                        subject = %masked,
                        channel = channel.name(),
                        receipt = %receipt,
                        event = "otp_delivered",
                        "Verification code delivered"
                    );
                    outcome = DeliveryOutcome::Delivered {
                        channel: channel.name().to_string(),
                        receipt,
                    };
                    break;
                }
                Err(e) => {
                    warn!(
                        subject = %masked,
                        channel = channel.name(),
                        error = %e,
                        event = "otp_delivery_channel_failed",
                        "Delivery channel failed, trying next"
                    );
                }
            }
        }

        let fallback_link = outbound
            .recipient_phone
            .as_deref()
            .and_then(|phone| self.deep_link.build(phone, &outbound.message));

        if outcome == DeliveryOutcome::DeferredToUser {
            warn!(
                subject = %masked,
                has_fallback_link = fallback_link.is_some(),
                event = "otp_delivery_deferred",
                "No delivery channel accepted the code"
            );
        }

        let message = match (&outcome, &fallback_link) {
            (DeliveryOutcome::Delivered { channel, .. }, _) => {
                format!("Verification code sent via {}", channel)
            }
            (DeliveryOutcome::DeferredToUser, Some(_)) => {
                "Automatic delivery is unavailable. Open the link to receive your verification code"
                    .to_string()
            }
            (DeliveryOutcome::DeferredToUser, None) => {
                "Automatic delivery is unavailable and no phone number is on file. Please contact support"
                    .to_string()
            }
        };

        DeliveryReport {
            outcome,
            message,
            fallback_link,
        }
    }

    async fn resolve_contact(&self, request: &DeliveryRequest) -> RegisteredContact {
        let Some(directory) = &self.directory else {
            return RegisteredContact::default();
        };

        match directory
            .registered_contact(request.subject_kind, &request.subject_value)
            .await
        {
            Ok(contact) => contact.unwrap_or_default(),
            Err(e) => {
                warn!(
                    subject = %request.subject_kind.mask(&request.subject_value),
                    error = %e,
                    event = "contact_lookup_failed",
                    "Contact directory lookup failed"
                );
                RegisteredContact::default()
            }
        }
    }
}
