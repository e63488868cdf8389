use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use tk_core::{IssueCodeResult, SubjectKind, VerifyCodeResult, CODE_LENGTH};
use tk_shared::utils::{
    indian_national_number, is_numeric_code, is_valid_aadhaar, normalize_document_number,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_subject", skip_on_field_errors = true))]
pub struct SendCodeRequest {
    /// `phone` or `identity_document` (`aadhaar` is accepted as an alias)
    #[validate(custom = "validate_subject_kind")]
    pub subject_kind: String,

    /// Indian mobile number (optional +91 or 0 prefix) or 12-digit Aadhaar number.
    /// Spaces and hyphens are ignored.
    #[validate(length(min = 1, max = 32))]
    pub subject_value: String,
}

impl SendCodeRequest {
    /// Kind and canonical value of the subject.
    ///
    /// Phones reduce to their 10 national digits and documents to their 12
    /// digits, so the same subject typed two ways maps to one session.
    /// Only meaningful after `validate()` succeeded.
    pub fn normalized_subject(&self) -> Option<(SubjectKind, String)> {
        let kind = self.subject_kind.parse::<SubjectKind>().ok()?;
        let value = match kind {
            SubjectKind::Phone => indian_national_number(&self.subject_value)?,
            SubjectKind::IdentityDocument => {
                let value = normalize_document_number(&self.subject_value);
                is_valid_aadhaar(&value).then_some(value)?
            }
        };
        Some((kind, value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,

    /// 6-digit verification code
    #[validate(custom = "validate_code")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendCodeRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,
}

/// Returned by send and resend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub session_id: String,
    pub subject_kind: SubjectKind,
    /// What the user should do next
    pub message: String,
    /// Whether a channel confirmed the hand-off
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Prefilled messaging-app link the user can open themselves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_link: Option<String>,
    /// Seconds until the code stops being accepted
    pub expires_in: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<IssueCodeResult> for SendCodeResponse {
    fn from(result: IssueCodeResult) -> Self {
        Self {
            delivered: result.delivery.is_delivered(),
            channel: result.delivery.channel().map(str::to_string),
            session_id: result.session_id,
            subject_kind: result.subject_kind,
            message: result.delivery.message,
            fallback_link: result.delivery.fallback_link,
            expires_in: result.expires_in_minutes * 60,
            expires_at: result.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub session_id: String,
    pub subject_kind: SubjectKind,
    pub verified: bool,
    pub already_verified: bool,
    pub attempts_used: u32,
    pub message: String,
}

impl From<VerifyCodeResult> for VerifyCodeResponse {
    fn from(result: VerifyCodeResult) -> Self {
        let message = match result.subject_kind {
            SubjectKind::Phone => "Phone number verified",
            SubjectKind::IdentityDocument => "Identity document verified",
        };
        Self {
            session_id: result.session_id,
            subject_kind: result.subject_kind,
            verified: result.verified,
            already_verified: result.already_verified,
            attempts_used: result.attempts_used,
            message: message.to_string(),
        }
    }
}

fn validate_subject_kind(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<SubjectKind>()
        .map(|_| ())
        .map_err(|_| invalid("subject_kind", "Subject kind must be phone or identity_document"))
}

fn validate_subject(request: &SendCodeRequest) -> Result<(), ValidationError> {
    if request.normalized_subject().is_some() {
        return Ok(());
    }
    let message = match request.subject_kind.parse::<SubjectKind>() {
        Ok(SubjectKind::IdentityDocument) => "Aadhaar number must be exactly 12 digits",
        _ => "Phone number must be a 10-digit Indian mobile number",
    };
    Err(invalid("subject_value", message))
}

fn validate_code(value: &str) -> Result<(), ValidationError> {
    if is_numeric_code(value, CODE_LENGTH) {
        Ok(())
    } else {
        Err(invalid("code", "Verification code must be 6 digits"))
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(kind: &str, value: &str) -> SendCodeRequest {
        SendCodeRequest {
            subject_kind: kind.to_string(),
            subject_value: value.to_string(),
        }
    }

    #[test]
    fn test_phone_normalization() {
        for input in [
            "9876543210",
            "+91 98765 43210",
            "919876543210",
            "98765-43210",
            "09876543210",
        ] {
            let request = send("phone", input);
            assert!(request.validate().is_ok(), "{} should be accepted", input);
            assert_eq!(
                request.normalized_subject(),
                Some((SubjectKind::Phone, "9876543210".to_string()))
            );
        }
    }

    #[test]
    fn test_phone_rejected() {
        assert!(send("phone", "98765").validate().is_err());
        assert!(send("phone", "1234567890").validate().is_err());
        assert!(send("phone", "+1 415 555 0100 22").validate().is_err());
    }

    #[test]
    fn test_document_validation() {
        let request = send("aadhaar", "1234 5678 9012");
        assert!(request.validate().is_ok());
        assert_eq!(
            request.normalized_subject(),
            Some((SubjectKind::IdentityDocument, "123456789012".to_string()))
        );

        assert!(send("identity_document", "12345678901").validate().is_err());
    }

    #[test]
    fn test_unknown_subject_kind() {
        let errors = send("passport", "9876543210").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("subject_kind"));
    }

    #[test]
    fn test_code_must_be_six_digits() {
        let request = |code: &str| VerifyCodeRequest {
            session_id: "abc".to_string(),
            code: code.to_string(),
        };
        assert!(request("123456").validate().is_ok());
        assert!(request("12345").validate().is_err());
        assert!(request("12345a").validate().is_err());
    }
}
