//! Delivery channel configuration
//!
//! Controls which channels of the OTP delivery fallback chain are active and
//! how they reach the outside world.

use serde::{Deserialize, Serialize};

/// Configuration for the OTP delivery fallback chain
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Brand name used in message templates
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Try the HTTP SMS provider first (requires `http_sms.api_key`)
    #[serde(default)]
    pub http_sms: HttpSmsConfig,

    /// Send through carrier email-to-SMS gateways
    #[serde(default = "default_true")]
    pub carrier_gateway_enabled: bool,

    /// Relay the code to the registered email address, if any
    #[serde(default = "default_true")]
    pub email_relay_enabled: bool,

    /// Outbound mail transport shared by the carrier gateway and email relay
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Messaging-app deep link fallback
    #[serde(default)]
    pub deep_link: DeepLinkConfig,

    /// Registered contacts seeded into the in-memory contact directory
    #[serde(default)]
    pub registered_contacts: Vec<RegisteredContactConfig>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            brand_name: default_brand_name(),
            http_sms: HttpSmsConfig::default(),
            carrier_gateway_enabled: true,
            email_relay_enabled: true,
            smtp: SmtpConfig::default(),
            deep_link: DeepLinkConfig::default(),
            registered_contacts: Vec::new(),
        }
    }
}

/// SMTP transport settings
///
/// An empty `host` puts the mailer in no-op mode: nothing is sent and the
/// mail-based channels report themselves unavailable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_smtp_from")]
    pub from: String,
    #[serde(default = "default_true")]
    pub use_starttls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from: default_smtp_from(),
            use_starttls: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SmtpConfig {
    /// Whether a relay host has been configured
    pub fn is_configured(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

/// HTTP SMS provider settings (Textbelt-compatible API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSmsConfig {
    #[serde(default = "default_http_sms_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSmsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_http_sms_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpSmsConfig {
    /// The provider is only used when an API key is present
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Messaging-app deep link settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepLinkConfig {
    /// Base URL of the click-to-chat endpoint
    #[serde(default = "default_deep_link_base")]
    pub base_url: String,

    /// Country dial code prepended to national numbers
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_deep_link_base(),
            default_country_code: default_country_code(),
        }
    }
}

/// A contact record for a verification subject
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisteredContactConfig {
    /// `phone` or `identity_document`
    pub subject_kind: String,
    pub subject_value: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

fn default_brand_name() -> String {
    String::from("TRINCK")
}

fn default_true() -> bool {
    true
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    String::from("Trinck <noreply@trinck.com>")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_http_sms_endpoint() -> String {
    String::from("https://textbelt.com/text")
}

fn default_deep_link_base() -> String {
    String::from("https://wa.me")
}

fn default_country_code() -> String {
    String::from("91")
}
