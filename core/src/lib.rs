//! # Trinck Core
//!
//! Core business logic for the Trinck OTP verification service.
//! This crate contains the verification session entity, the session manager,
//! the delivery fallback chain policy, the collaborator traits implemented by
//! the infrastructure layer, and the domain error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
