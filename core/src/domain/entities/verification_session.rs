//! Verification session entity for OTP-based phone and identity document checks.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use tk_shared::utils::{document::mask_document_number, phone::mask_phone_number};

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// What a verification session proves ownership of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A mobile phone number
    Phone,
    /// A national identity document number (Aadhaar)
    IdentityDocument,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Phone => "phone",
            SubjectKind::IdentityDocument => "identity_document",
        }
    }

    /// Mask a subject value of this kind for logs and responses
    pub fn mask(&self, value: &str) -> String {
        match self {
            SubjectKind::Phone => mask_phone_number(value),
            SubjectKind::IdentityDocument => mask_document_number(value),
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phone" => Ok(SubjectKind::Phone),
            "identity_document" | "aadhaar" => Ok(SubjectKind::IdentityDocument),
            _ => Err(format!("Unknown subject kind: {}", s)),
        }
    }
}

/// Result of a single verification attempt against a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The code matched; the session is now verified
    Matched,
    /// The code did not match; the attempt was counted
    Mismatched { remaining_attempts: u32 },
    /// The session was verified earlier; nothing changed
    AlreadyVerified,
    /// The expiry window has passed; nothing changed
    Expired,
    /// The attempt ceiling was already reached; nothing changed
    Exhausted,
}

/// A one-time code issued for a subject, with its expiry and attempt bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSession {
    /// Opaque session token handed to the client
    pub id: String,

    /// Kind of subject being verified
    pub subject_kind: SubjectKind,

    /// Phone number or document number, kept in clear text for the session lifetime
    pub subject_value: String,

    /// The 6-digit verification code
    pub code: String,

    /// Verification attempts made so far, successful or not
    pub attempts_used: u32,

    /// Attempt ceiling fixed at issuance
    pub max_attempts: u32,

    /// Timestamp when the session was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Set once, on the first successful match
    pub verified: bool,
}

impl VerificationSession {
    /// Issue a new session with a fresh code and session id
    ///
    /// # Arguments
    ///
    /// * `subject_kind` - What is being verified
    /// * `subject_value` - The phone or document number, taken verbatim
    /// * `issued_at` - Issuance time; expiry is computed from it
    /// * `lifetime` - How long the code stays valid
    /// * `max_attempts` - Verification attempts allowed
    pub fn issue(
        subject_kind: SubjectKind,
        subject_value: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            id: Self::generate_session_id(),
            subject_kind,
            subject_value: subject_value.into(),
            code: Self::generate_code(),
            attempts_used: 0,
            max_attempts,
            created_at: issued_at,
            expires_at: issued_at + lifetime,
            verified: false,
        }
    }

    /// Generate a 6-digit code, uniform over 100000..=999999, from the OS CSPRNG
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..=999_999);
        code.to_string()
    }

    /// Generate an opaque, unguessable session token
    pub fn generate_session_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts_used >= self.max_attempts
    }

    /// A session accepts codes only while unexpired, under the attempt
    /// ceiling and not yet verified
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_exhausted() && !self.verified
    }

    pub fn matches_subject(&self, kind: SubjectKind, value: &str) -> bool {
        self.subject_kind == kind && self.subject_value == value
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    /// Minutes the code was issued for, rounded up
    pub fn lifetime_minutes(&self) -> i64 {
        let seconds = (self.expires_at - self.created_at).num_seconds().max(0);
        (seconds + 59) / 60
    }

    /// Apply one verification attempt
    ///
    /// A verified session is inert. Expired and exhausted sessions are left
    /// untouched so the caller can discard them. Otherwise the attempt is
    /// counted before the codes are compared.
    pub fn attempt(&mut self, input_code: &str, now: DateTime<Utc>) -> AttemptOutcome {
        if self.verified {
            return AttemptOutcome::AlreadyVerified;
        }
        if self.is_expired_at(now) {
            return AttemptOutcome::Expired;
        }
        if self.is_exhausted() {
            return AttemptOutcome::Exhausted;
        }

        self.attempts_used += 1;

        if self.code.len() == input_code.len()
            && constant_time_eq(self.code.as_bytes(), input_code.as_bytes())
        {
            self.verified = true;
            AttemptOutcome::Matched
        } else {
            AttemptOutcome::Mismatched {
                remaining_attempts: self.remaining_attempts(),
            }
        }
    }

    /// Read-only projection that never exposes the code
    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            subject_kind: self.subject_kind,
            masked_subject: self.subject_kind.mask(&self.subject_value),
            verified: self.verified,
            attempts_used: self.attempts_used,
            remaining_attempts: self.remaining_attempts(),
            expires_at: self.expires_at,
        }
    }
}

/// Status of a session as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub subject_kind: SubjectKind,
    pub masked_subject: String,
    pub verified: bool,
    pub attempts_used: u32,
    pub remaining_attempts: u32,
    pub expires_at: DateTime<Utc>,
}
