//! Shared utilities and common types for the Trinck server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered loader
//! - Error response structures
//! - Utility functions (phone and identity document handling)
//! - API response wrappers

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DeliveryConfig, Environment, LoggingConfig, OtpConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::ApiResponse;
pub use utils::{document, phone, validation};
