//! Mock mailer for development and testing
//!
//! Records every message instead of sending it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use super::{mask_email, Mailer};
use crate::InfrastructureError;

/// A message captured by the mock mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub message_id: String,
}

/// Mock mailer for development and testing
#[derive(Clone, Default)]
pub struct MockMailer {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Messages sent so far
    outbox: Arc<Mutex<Vec<SentMail>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to report the transport as disabled
    disabled: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock mailer whose sends always fail
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Create a mock mailer that reports itself as not configured
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<SentMail> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if self.disabled {
            return Err(InfrastructureError::Mail(
                "Mock mail transport is disabled".to_string(),
            ));
        }

        if self.simulate_failure {
            warn!(
                recipient = %mask_email(recipient),
                "Mock mailer simulating failure"
            );
            return Err(InfrastructureError::Mail(
                "Simulated mail sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(SentMail {
                recipient: recipient.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
                message_id: message_id.clone(),
            });
        }

        info!(
            target: "mail_service",
            transport = "mock",
            recipient = %mask_email(recipient),
            message_id = %message_id,
            count = count,
            "Mock email recorded"
        );

        Ok(message_id)
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn transport_name(&self) -> &str {
        "mock"
    }
}
