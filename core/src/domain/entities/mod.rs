//! Domain entities representing core business objects.

pub mod verification_session;

// Re-export commonly used types
pub use verification_session::{
    AttemptOutcome, SessionView, SubjectKind, VerificationSession, CODE_LENGTH,
    DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS,
};
