//! HTTP SMS provider channel (Textbelt-compatible API)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use tk_core::{DeliveryChannel, OutboundCode};
use tk_shared::config::HttpSmsConfig;
use tk_shared::utils::phone::{digits_only, mask_phone_number};

use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    phone: &'a str,
    message: &'a str,
    key: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendTextResponse {
    success: bool,
    #[serde(default)]
    text_id: Option<serde_json::Value>,
    #[serde(default)]
    quota_remaining: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

/// Sends the code through an HTTP SMS provider
pub struct HttpSmsChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    default_country_code: String,
}

impl HttpSmsChannel {
    /// Create the channel; fails when no API key is configured
    pub fn new(
        config: &HttpSmsConfig,
        default_country_code: impl Into<String>,
    ) -> Result<Self, InfrastructureError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| InfrastructureError::Config("HTTP SMS API key not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(endpoint = %config.endpoint, "HTTP SMS provider configured");

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            default_country_code: default_country_code.into(),
        })
    }

    /// Format a phone number as E.164, adding the default country code to
    /// 10-digit national numbers
    pub fn to_e164(&self, phone: &str) -> Option<String> {
        let digits = digits_only(phone);
        match digits.len() {
            10 => Some(format!("+{}{}", self.default_country_code, digits)),
            11..=15 => Some(format!("+{}", digits)),
            _ => None,
        }
    }

    async fn send_text(&self, phone: &str, message: &str) -> Result<String, InfrastructureError> {
        let body = SendTextRequest {
            phone,
            message,
            key: &self.api_key,
        };

        let response: SendTextResponse = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(InfrastructureError::Sms(
                response
                    .error
                    .unwrap_or_else(|| "provider rejected the message".to_string()),
            ));
        }

        debug!(
            phone = %mask_phone_number(phone),
            quota_remaining = ?response.quota_remaining,
            "SMS accepted by provider"
        );

        Ok(match response.text_id {
            Some(serde_json::Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => "accepted".to_string(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for HttpSmsChannel {
    fn name(&self) -> &str {
        "http_sms"
    }

    async fn deliver(&self, outbound: &OutboundCode) -> Result<String, String> {
        let phone = outbound
            .recipient_phone
            .as_deref()
            .ok_or_else(|| "no recipient phone number".to_string())?;

        let e164 = self
            .to_e164(phone)
            .ok_or_else(|| format!("cannot format {} for SMS", mask_phone_number(phone)))?;

        self.send_text(&e164, &outbound.message).await.map_err(|e| {
            warn!(
                phone = %mask_phone_number(&e164),
                error = %e,
                "HTTP SMS provider failed"
            );
            e.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> HttpSmsConfig {
        HttpSmsConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            HttpSmsChannel::new(&config(None), "91"),
            Err(InfrastructureError::Config(_))
        ));
        assert!(HttpSmsChannel::new(&config(Some("   ")), "91").is_err());
    }

    #[test]
    fn test_e164_formatting() {
        let channel = HttpSmsChannel::new(&config(Some("key")), "91").unwrap();

        assert_eq!(channel.to_e164("9876543210").as_deref(), Some("+919876543210"));
        assert_eq!(channel.to_e164("+91 98765 43210").as_deref(), Some("+919876543210"));
        assert_eq!(channel.to_e164("1-415-555-0100").as_deref(), Some("+14155550100"));
        assert!(channel.to_e164("12345").is_none());
    }
}
