//! Identity document (Aadhaar) number utilities

use once_cell::sync::Lazy;
use regex::Regex;

static AADHAAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").expect("static regex"));

/// Strip the spaces and hyphens users type between digit groups
pub fn normalize_document_number(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Check if a value is a 12-digit Aadhaar number
pub fn is_valid_aadhaar(value: &str) -> bool {
    AADHAAR_REGEX.is_match(&normalize_document_number(value))
}

/// Mask a document number, keeping only the last 4 characters
pub fn mask_document_number(value: &str) -> String {
    let normalized = normalize_document_number(value);
    let count = normalized.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = normalized.chars().skip(count - 4).collect();
    format!("{}{}", "X".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_aadhaar() {
        assert!(is_valid_aadhaar("123456789012"));
        assert!(is_valid_aadhaar("1234 5678 9012"));
        assert!(!is_valid_aadhaar("12345678901"));
        assert!(!is_valid_aadhaar("12345678901a"));
    }

    #[test]
    fn test_mask_document_number() {
        assert_eq!(mask_document_number("1234 5678 9012"), "XXXXXXXX9012");
        assert_eq!(mask_document_number("123"), "***");
    }
}
