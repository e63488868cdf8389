//! Mail Module
//!
//! Outbound mail used by the carrier gateway and email relay channels.
//!
//! ## Features
//!
//! - **Mailer Trait**: Common interface for mail transports
//! - **SMTP Implementation**: lettre async transport, no-op when no host is configured
//! - **Mock Implementation**: Records messages for tests and local development

use async_trait::async_trait;

use crate::InfrastructureError;

mod mock_mailer;
mod smtp;

pub use mock_mailer::{MockMailer, SentMail};
pub use smtp::SmtpMailer;

/// Trait for mail transports
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text message, returning its message id
    async fn send_mail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Whether the transport can actually send mail
    fn is_enabled(&self) -> bool;

    /// Transport name for logs
    fn transport_name(&self) -> &str;
}

/// Mask an email address for logs (e.g., 9***0@vtext.com)
pub fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let first = local.chars().next().unwrap_or('*');
            let last = local.chars().last().unwrap_or('*');
            format!("{}***{}@{}", first, last, domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}
