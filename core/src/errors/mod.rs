//! Domain-specific error types and error handling.

use thiserror::Error;
use tk_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Outcomes of the verification session manager that callers must handle
///
/// These are expected business results rather than system failures; the
/// presentation layer maps each one to its own status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("A verification code was already issued. Please wait before requesting a new one")]
    AlreadyPending,

    #[error("Verification session not found. Please start verification again")]
    SessionNotFound,

    #[error("Verification code expired. Please request a new one")]
    Expired,

    #[error("Maximum verification attempts exceeded. Please request a new code")]
    AttemptsExhausted,

    #[error("Invalid verification code. {remaining_attempts} attempts remaining")]
    InvalidCode { remaining_attempts: u32 },
}

impl VerificationError {
    /// Stable error code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::AlreadyPending => error_codes::CODE_ALREADY_PENDING,
            VerificationError::SessionNotFound => error_codes::SESSION_NOT_FOUND,
            VerificationError::Expired => error_codes::VERIFICATION_CODE_EXPIRED,
            VerificationError::AttemptsExhausted => error_codes::ATTEMPTS_EXHAUSTED,
            VerificationError::InvalidCode { .. } => error_codes::VERIFICATION_CODE_INVALID,
        }
    }
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl DomainError {
    /// The verification outcome carried by this error, if any
    pub fn as_verification(&self) -> Option<&VerificationError> {
        match self {
            DomainError::Verification(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Verification(err) => {
                let response = ErrorResponse::new(err.error_code(), err.to_string());
                match err {
                    VerificationError::InvalidCode { remaining_attempts } => {
                        response.add_detail("remaining_attempts", remaining_attempts)
                    }
                    _ => response,
                }
            }
            // Store details stay in the logs
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
