//! Configuration for the verification service

use tk_shared::config::{Environment, OtpConfig, MAX_EXPIRATION_MINUTES};

use crate::domain::entities::verification_session::{DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes before a verification code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of verification attempts allowed
    pub max_attempts: u32,
    /// Whether generated codes may appear in debug logs (development only)
    pub log_codes: bool,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            log_codes: false,
        }
    }
}

impl VerificationServiceConfig {
    /// Build the service configuration from application settings
    pub fn from_settings(otp: &OtpConfig, environment: Environment) -> Self {
        Self {
            code_expiration_minutes: otp.code_expiration_minutes,
            max_attempts: otp.max_attempts,
            log_codes: environment.logs_codes(),
        }
    }

    /// Code lifetime, clamped to between one minute and one day
    pub fn code_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.code_expiration_minutes.clamp(1, MAX_EXPIRATION_MINUTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = VerificationServiceConfig::default();
        assert_eq!(config.code_expiration_minutes, 5);
        assert_eq!(config.max_attempts, 3);
        assert!(!config.log_codes);
        assert_eq!(config.code_lifetime(), chrono::Duration::minutes(5));
    }

    #[test]
    fn test_out_of_range_lifetime_is_clamped() {
        let config = VerificationServiceConfig {
            code_expiration_minutes: i64::MAX,
            ..Default::default()
        };
        assert_eq!(config.code_lifetime(), chrono::Duration::minutes(MAX_EXPIRATION_MINUTES));

        let config = VerificationServiceConfig {
            code_expiration_minutes: -3,
            ..Default::default()
        };
        assert_eq!(config.code_lifetime(), chrono::Duration::minutes(1));
    }

    #[test]
    fn test_codes_only_logged_in_development() {
        let otp = OtpConfig::default();
        assert!(VerificationServiceConfig::from_settings(&otp, Environment::Development).log_codes);
        assert!(!VerificationServiceConfig::from_settings(&otp, Environment::Production).log_codes);
    }
}
