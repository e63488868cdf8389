//! Verification session configuration

use serde::{Deserialize, Serialize};

/// Longest accepted code lifetime (one day)
pub const MAX_EXPIRATION_MINUTES: i64 = 24 * 60;

/// Lifetime and attempt limits for one-time codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a code stays valid after issuance
    #[serde(default = "default_expiration_minutes")]
    pub code_expiration_minutes: i64,

    /// Verification attempts allowed per session
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: default_expiration_minutes(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl OtpConfig {
    /// Reject lifetimes and attempt limits the service cannot honour
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_EXPIRATION_MINUTES).contains(&self.code_expiration_minutes) {
            return Err(format!(
                "otp.code_expiration_minutes must be between 1 and {}, got {}",
                MAX_EXPIRATION_MINUTES, self.code_expiration_minutes
            ));
        }
        if self.max_attempts == 0 {
            return Err("otp.max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

fn default_expiration_minutes() -> i64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}
