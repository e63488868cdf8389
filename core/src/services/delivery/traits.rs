//! Traits for delivery channel and contact directory integration

use async_trait::async_trait;

use crate::domain::entities::verification_session::SubjectKind;

use super::types::{OutboundCode, RegisteredContact};

/// A way of getting a code to its owner
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Short channel name used in logs and delivery reports
    fn name(&self) -> &str;
    /// Deliver the code, returning a provider receipt or message id
    ///
    /// Channels that cannot serve this recipient (no phone, no email on
    /// file, transport not configured) return `Err` so the chain moves on.
    async fn deliver(&self, outbound: &OutboundCode) -> Result<String, String>;
}

/// Read-only lookup of contact details registered for a subject
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn registered_contact(
        &self,
        kind: SubjectKind,
        value: &str,
    ) -> Result<Option<RegisteredContact>, String>;
}
