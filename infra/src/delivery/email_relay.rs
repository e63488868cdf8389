//! Registered-email relay channel

use async_trait::async_trait;
use std::sync::Arc;

use tk_core::{DeliveryChannel, OutboundCode};
use tk_shared::utils::validation::is_valid_email;

use crate::mail::Mailer;

/// Mails the code to the email address registered for the subject
pub struct EmailRelayChannel {
    mailer: Arc<dyn Mailer>,
}

impl EmailRelayChannel {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl DeliveryChannel for EmailRelayChannel {
    fn name(&self) -> &str {
        "email_relay"
    }

    async fn deliver(&self, outbound: &OutboundCode) -> Result<String, String> {
        let email = outbound
            .recipient_email
            .as_deref()
            .ok_or_else(|| "no registered email address".to_string())?;

        if !is_valid_email(email) {
            return Err("registered email address is invalid".to_string());
        }

        if !self.mailer.is_enabled() {
            return Err(format!(
                "{} mail transport is not configured",
                self.mailer.transport_name()
            ));
        }

        self.mailer
            .send_mail(email, &outbound.subject_line, &outbound.message)
            .await
            .map_err(|e| e.to_string())
    }
}
