//! Types passed through the delivery chain

use serde::{Deserialize, Serialize};

use crate::domain::entities::verification_session::SubjectKind;

/// A freshly issued code that needs to reach its owner
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub subject_kind: SubjectKind,
    pub subject_value: String,
    pub code: String,
    pub expires_in_minutes: i64,
}

/// Contact details registered for a subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredContact {
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// The code and its rendered message, addressed to the resolved recipient
#[derive(Debug, Clone)]
pub struct OutboundCode {
    pub subject_kind: SubjectKind,
    pub code: String,
    /// Mobile number to reach, if known
    pub recipient_phone: Option<String>,
    /// Registered email address, if any
    pub recipient_email: Option<String>,
    /// Plain-text message body
    pub message: String,
    /// Subject line for mail-based channels
    pub subject_line: String,
}

/// How a code left the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// A channel accepted the message
    Delivered { channel: String, receipt: String },
    /// No channel accepted the message; the user has to act on the fallback link
    DeferredToUser,
}

/// Result of running the delivery chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub outcome: DeliveryOutcome,
    /// User-facing summary of what happened
    pub message: String,
    /// Click-to-chat link carrying the code, when a phone number is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_link: Option<String>,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }

    /// Name of the channel that accepted the message
    pub fn channel(&self) -> Option<&str> {
        match &self.outcome {
            DeliveryOutcome::Delivered { channel, .. } => Some(channel),
            DeliveryOutcome::DeferredToUser => None,
        }
    }
}
