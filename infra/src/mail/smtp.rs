//! SMTP mail transport

use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use tk_shared::config::SmtpConfig;

use super::{mask_email, Mailer};
use crate::InfrastructureError;

/// Async SMTP transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the mailer from configuration
    ///
    /// If the SMTP host is empty, operates in no-op mode: `is_enabled`
    /// returns false and every send fails.
    pub fn new(config: &SmtpConfig) -> Result<Self, InfrastructureError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP from address: {}", e)))?;

        let transport = if !config.is_configured() {
            warn!("SMTP host not configured; mail-based delivery channels are disabled");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            }
            .map_err(|e| {
                InfrastructureError::Config(format!("Failed to configure SMTP transport: {}", e))
            })?
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

            let builder = if let (Some(username), Some(password)) =
                (&config.username, &config.password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            info!(host = %config.host, port = config.port, "SMTP transport configured");
            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        let Some(transport) = &self.transport else {
            return Err(InfrastructureError::Mail(
                "SMTP transport is not configured".to_string(),
            ));
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid recipient address: {}", e)))?;

        let message_id = format!("<{}@trinck.otp>", Uuid::new_v4().simple());
        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Mail(format!("Failed to build email message: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| InfrastructureError::Mail(format!("Failed to send email: {}", e)))?;

        info!(
            recipient = %mask_email(recipient),
            message_id = %message_id,
            "Email sent successfully"
        );
        Ok(message_id)
    }

    fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn transport_name(&self) -> &str {
        "smtp"
    }
}
