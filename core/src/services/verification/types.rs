//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::verification_session::SubjectKind;
use crate::services::delivery::DeliveryReport;

/// Result of issuing (or re-issuing) a verification code
#[derive(Debug, Clone, Serialize)]
pub struct IssueCodeResult {
    /// Session token the client presents when verifying
    pub session_id: String,
    /// What the session verifies
    pub subject_kind: SubjectKind,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Minutes the code stays valid
    pub expires_in_minutes: i64,
    /// How the code reached (or can reach) the user
    pub delivery: DeliveryReport,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyCodeResult {
    pub session_id: String,
    pub subject_kind: SubjectKind,
    /// Always true; failures are reported as errors
    pub verified: bool,
    /// The session had already been verified by an earlier call
    pub already_verified: bool,
    /// Attempts counted on this session, including the successful one
    pub attempts_used: u32,
}
