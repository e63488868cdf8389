//! Conversion of domain and request errors into HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

use tk_core::{DomainError, VerificationError};
use tk_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request data")]
    Validation(#[from] ValidationErrors),

    #[error("Malformed request body: {0}")]
    BadRequest(String),
}

/// HTTP status for a verification outcome
pub fn verification_status(error: &VerificationError) -> StatusCode {
    match error {
        VerificationError::AlreadyPending => StatusCode::TOO_MANY_REQUESTS,
        VerificationError::SessionNotFound => StatusCode::NOT_FOUND,
        VerificationError::Expired => StatusCode::GONE,
        VerificationError::AttemptsExhausted => StatusCode::TOO_MANY_REQUESTS,
        VerificationError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
    }
}

impl ApiError {
    fn error_response_body(&self) -> ErrorResponse {
        match self {
            ApiError::Domain(error) => error.to_error_response(),
            ApiError::Validation(errors) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
                    .add_detail("fields", field_messages(errors))
            }
            ApiError::BadRequest(message) => {
                ErrorResponse::new(error_codes::BAD_REQUEST, message.clone())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::Verification(error)) => verification_status(error),
            ApiError::Domain(DomainError::Internal { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        HttpResponse::build(status).json(self.error_response_body())
    }
}

/// Field name to messages, for the `fields` detail of validation errors
///
/// Struct-level checks land under `__all__`; they carry the offending field
/// name as their error code.
fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for (field, errors) in errors.field_errors() {
        for error in errors {
            let key = if field == "__all__" {
                error.code.to_string()
            } else {
                field.to_string()
            };
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            fields.entry(key).or_default().push(message);
        }
    }
    fields
}

/// Turn JSON extractor failures into the standard error body
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(error.to_string()).into()
}
