//! Business services containing domain logic and use cases.

pub mod delivery;
pub mod verification;

// Re-export commonly used types
pub use delivery::{
    ContactDirectory, DeepLinkBuilder, DeliveryChain, DeliveryChannel, DeliveryOutcome,
    DeliveryReport, DeliveryRequest, OutboundCode, RegisteredContact,
};
pub use verification::{
    Clock, IssueCodeResult, ManualClock, SessionStore, SystemClock, VerificationService,
    VerificationServiceConfig, VerifyCodeResult,
};
