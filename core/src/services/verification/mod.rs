//! Verification session manager
//!
//! This module provides the one-time code workflow:
//! - Code issuance with a single pending session per subject
//! - Code verification with expiry and attempt tracking
//! - Resend that supersedes the previous session
//! - Lazy sweep of expired sessions

mod clock;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::SessionStore;
pub use types::{IssueCodeResult, VerifyCodeResult};
