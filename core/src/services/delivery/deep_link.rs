//! Click-to-chat deep links

use tk_shared::config::DeepLinkConfig;
use tk_shared::utils::phone::digits_only;

/// Builds `https://wa.me/<digits>?text=<message>` style links
#[derive(Debug, Clone)]
pub struct DeepLinkBuilder {
    base_url: String,
    default_country_code: String,
}

impl DeepLinkBuilder {
    pub fn new(base_url: impl Into<String>, default_country_code: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_country_code: default_country_code.into(),
        }
    }

    pub fn from_config(config: &DeepLinkConfig) -> Self {
        Self::new(config.base_url.clone(), config.default_country_code.clone())
    }

    /// Convert a phone number to the international digit string used in links
    ///
    /// National 10-digit numbers (optionally with a trunk `0`) get the default
    /// country code; anything longer is assumed to carry one already.
    pub fn international_digits(&self, phone: &str) -> Option<String> {
        let digits = digits_only(phone);
        let national = match digits.len() {
            0 => return None,
            11 if digits.starts_with('0') => &digits[1..],
            _ => digits.as_str(),
        };

        if national.len() == 10 {
            Some(format!("{}{}", self.default_country_code, national))
        } else {
            Some(national.to_string())
        }
    }

    /// Build a link that opens a chat with `phone`, prefilled with `message`
    pub fn build(&self, phone: &str, message: &str) -> Option<String> {
        let digits = self.international_digits(phone)?;
        Some(format!(
            "{}/{}?text={}",
            self.base_url.trim_end_matches('/'),
            digits,
            urlencoding::encode(message)
        ))
    }
}

impl Default for DeepLinkBuilder {
    fn default() -> Self {
        Self::from_config(&DeepLinkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_number_gets_country_code() {
        let builder = DeepLinkBuilder::default();
        let link = builder.build("9876543210", "Your code is 123456").unwrap();
        assert_eq!(
            link,
            "https://wa.me/919876543210?text=Your%20code%20is%20123456"
        );
    }

    #[test]
    fn test_national_number_starting_with_country_digits() {
        let builder = DeepLinkBuilder::default();
        assert_eq!(
            builder.international_digits("9123456789").as_deref(),
            Some("919123456789")
        );
    }

    #[test]
    fn test_international_number_kept() {
        let builder = DeepLinkBuilder::default();
        assert_eq!(
            builder.international_digits("+91 98765 43210").as_deref(),
            Some("919876543210")
        );
        assert_eq!(
            builder.international_digits("+1 (415) 555-0100").as_deref(),
            Some("14155550100")
        );
        assert_eq!(
            builder.international_digits("09876543210").as_deref(),
            Some("919876543210")
        );
    }

    #[test]
    fn test_no_digits_no_link() {
        let builder = DeepLinkBuilder::new("https://wa.me/", "91");
        assert!(builder.build("n/a", "hello").is_none());
    }
}
