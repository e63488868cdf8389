//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Indian mobile numbers: 10 digits starting with 6-9
static INDIA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[6-9]\d{9}$").expect("static regex")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Keep only the ASCII digits of a phone number
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Reduce an Indian number to its 10-digit national form.
///
/// Accepts `9876543210`, `+91 98765 43210`, `919876543210` and `09876543210`.
/// Returns `None` when the input does not look like an Indian mobile number.
pub fn indian_national_number(phone: &str) -> Option<String> {
    let digits = digits_only(phone);
    let national = match digits.len() {
        10 => digits,
        11 if digits.starts_with('0') => digits[1..].to_string(),
        12 if digits.starts_with("91") => digits[2..].to_string(),
        _ => return None,
    };

    INDIA_MOBILE_REGEX.is_match(&national).then_some(national)
}

/// Mask a phone number for display (e.g., 987****3210)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
