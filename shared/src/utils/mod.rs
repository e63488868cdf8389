//! Common utility functions

pub mod document;
pub mod phone;
pub mod validation;

// Re-export commonly used utilities
pub use document::*;
pub use phone::*;
pub use validation::*;
