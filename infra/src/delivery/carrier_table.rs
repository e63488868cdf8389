//! Static carrier email-to-SMS gateway table
//!
//! Carrier detection is a best-effort guess from the country dial code and
//! the leading digits of the national number. A wrong guess routes the
//! message to another carrier's gateway, where it is silently dropped.

use tk_shared::utils::phone::digits_only;

/// A carrier and the domain of its email-to-SMS gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarrierGateway {
    /// Country dial code without `+`
    pub dial_code: &'static str,
    pub carrier: &'static str,
    pub domain: &'static str,
}

/// Maps national numbers starting with `prefix` to a carrier
///
/// An empty prefix is the country's fallback carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierRoute {
    pub dial_code: String,
    pub prefix: String,
    pub carrier: String,
}

/// The gateway mailbox a number resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAddress {
    pub carrier: String,
    pub domain: String,
    /// National number used as the mailbox local part
    pub local_number: String,
    /// `<local_number>@<domain>`
    pub address: String,
}

const GATEWAYS: &[CarrierGateway] = &[
    // India
    CarrierGateway { dial_code: "91", carrier: "Airtel", domain: "airtelmail.com" },
    CarrierGateway { dial_code: "91", carrier: "Jio", domain: "jiomsg.com" },
    CarrierGateway { dial_code: "91", carrier: "Vi", domain: "vtext.com" },
    CarrierGateway { dial_code: "91", carrier: "BSNL", domain: "bsnlmail.com" },
    // United States
    CarrierGateway { dial_code: "1", carrier: "Verizon", domain: "vtext.com" },
    CarrierGateway { dial_code: "1", carrier: "AT&T", domain: "txt.att.net" },
    CarrierGateway { dial_code: "1", carrier: "T-Mobile", domain: "tmomail.net" },
    CarrierGateway { dial_code: "1", carrier: "Sprint", domain: "messaging.sprintpcs.com" },
    // United Kingdom
    CarrierGateway { dial_code: "44", carrier: "EE", domain: "mmail.co.uk" },
    CarrierGateway { dial_code: "44", carrier: "O2", domain: "o2.co.uk" },
    CarrierGateway { dial_code: "44", carrier: "Three", domain: "3mail.com" },
    CarrierGateway { dial_code: "44", carrier: "Vodafone UK", domain: "vodafone.net" },
];

/// Carrier lookup keyed by country dial code and number prefix
#[derive(Debug, Clone)]
pub struct CarrierTable {
    gateways: Vec<CarrierGateway>,
    routes: Vec<CarrierRoute>,
    default_dial_code: String,
}

impl CarrierTable {
    /// Built-in gateways with one fallback carrier per country
    pub fn new(default_dial_code: impl Into<String>) -> Self {
        Self {
            gateways: GATEWAYS.to_vec(),
            routes: vec![
                CarrierRoute::fallback("91", "Airtel"),
                CarrierRoute::fallback("1", "Verizon"),
                CarrierRoute::fallback("44", "EE"),
            ],
            default_dial_code: default_dial_code.into(),
        }
    }

    /// Add a prefix route; longer prefixes win over shorter ones
    pub fn with_route(
        mut self,
        dial_code: impl Into<String>,
        prefix: impl Into<String>,
        carrier: impl Into<String>,
    ) -> Self {
        self.routes.push(CarrierRoute {
            dial_code: dial_code.into(),
            prefix: prefix.into(),
            carrier: carrier.into(),
        });
        self
    }

    pub fn gateways(&self) -> &[CarrierGateway] {
        &self.gateways
    }

    /// Gateway domain of a carrier within a country
    pub fn domain_for(&self, dial_code: &str, carrier: &str) -> Option<&'static str> {
        self.gateways
            .iter()
            .find(|g| g.dial_code == dial_code && g.carrier.eq_ignore_ascii_case(carrier))
            .map(|g| g.domain)
    }

    /// Split a phone number into dial code and 10-digit national number
    ///
    /// Bare 10-digit numbers are assumed to belong to the default country.
    pub fn split_number(&self, phone: &str) -> Option<(String, String)> {
        let digits = digits_only(phone);
        match digits.len() {
            10 => Some((self.default_dial_code.clone(), digits)),
            11 if digits.starts_with('0') => {
                Some((self.default_dial_code.clone(), digits[1..].to_string()))
            }
            11 if digits.starts_with('1') => Some(("1".to_string(), digits[1..].to_string())),
            12 if digits.starts_with("91") => Some(("91".to_string(), digits[2..].to_string())),
            12 if digits.starts_with("44") => Some(("44".to_string(), digits[2..].to_string())),
            _ => None,
        }
    }

    /// Guess the gateway mailbox for a phone number
    pub fn resolve(&self, phone: &str) -> Option<GatewayAddress> {
        let (dial_code, national) = self.split_number(phone)?;

        let route = self
            .routes
            .iter()
            .filter(|r| r.dial_code == dial_code && national.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len())?;

        let domain = self.domain_for(&dial_code, &route.carrier)?;

        Some(GatewayAddress {
            carrier: route.carrier.clone(),
            domain: domain.to_string(),
            address: format!("{}@{}", national, domain),
            local_number: national,
        })
    }
}

impl Default for CarrierTable {
    fn default() -> Self {
        Self::new("91")
    }
}

impl CarrierRoute {
    fn fallback(dial_code: &str, carrier: &str) -> Self {
        Self {
            dial_code: dial_code.to_string(),
            prefix: String::new(),
            carrier: carrier.to_string(),
        }
    }
}
