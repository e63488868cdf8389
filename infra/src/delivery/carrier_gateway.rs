//! Carrier email-to-SMS gateway channel

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use tk_core::{DeliveryChannel, OutboundCode};
use tk_shared::utils::phone::mask_phone_number;

use super::carrier_table::CarrierTable;
use crate::mail::Mailer;

/// Sends the code as an email to the guessed carrier's SMS gateway
pub struct CarrierGatewayChannel {
    table: CarrierTable,
    mailer: Arc<dyn Mailer>,
}

impl CarrierGatewayChannel {
    pub fn new(table: CarrierTable, mailer: Arc<dyn Mailer>) -> Self {
        Self { table, mailer }
    }
}

#[async_trait]
impl DeliveryChannel for CarrierGatewayChannel {
    fn name(&self) -> &str {
        "carrier_gateway"
    }

    async fn deliver(&self, outbound: &OutboundCode) -> Result<String, String> {
        let phone = outbound
            .recipient_phone
            .as_deref()
            .ok_or_else(|| "no recipient phone number".to_string())?;

        if !self.mailer.is_enabled() {
            return Err(format!(
                "{} mail transport is not configured",
                self.mailer.transport_name()
            ));
        }

        let gateway = self
            .table
            .resolve(phone)
            .ok_or_else(|| format!("no carrier gateway for {}", mask_phone_number(phone)))?;

        debug!(
            phone = %mask_phone_number(phone),
            carrier = %gateway.carrier,
            domain = %gateway.domain,
            "Routing code through carrier gateway"
        );

        self.mailer
            .send_mail(&gateway.address, &outbound.subject_line, &outbound.message)
            .await
            .map_err(|e| e.to_string())
    }
}
