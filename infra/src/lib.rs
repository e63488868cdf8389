//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Trinck OTP
//! verification service. It provides concrete implementations of the
//! collaborator traits declared in `tk_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Store**: Process-local session store
//! - **Mail**: SMTP transport (lettre) and a mock mailer
//! - **Delivery**: HTTP SMS provider, carrier email-to-SMS gateways,
//!   registered-email relay and the contact directory
//! - **Bootstrap**: Wiring of the verification service from `AppConfig`

// Re-export core types for convenience
pub use tk_core::errors::*;

/// Session store module - in-memory implementation
pub mod store;

/// Mail module - SMTP transport and mock
pub mod mail;

/// Delivery module - channel implementations for the fallback chain
pub mod delivery;

/// Bootstrap module - builds the verification service from configuration
pub mod bootstrap;

pub use bootstrap::{build_delivery_chain, build_verification_service, AppVerificationService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail transport error
    #[error("Mail error: {0}")]
    Mail(String),

    /// SMS provider error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Domain error raised while bootstrapping
    #[error(transparent)]
    Domain(#[from] DomainError),
}
