//! Delivery Channel Module
//!
//! Concrete channels for the OTP delivery fallback chain, in the order the
//! bootstrap wires them:
//!
//! - **HTTP SMS**: Textbelt-compatible provider, only with an API key
//! - **Carrier Gateway**: email-to-SMS through a guessed carrier domain
//! - **Email Relay**: the subject's registered email address
//!
//! The contact directory resolving registered phones and emails also lives
//! here.

mod carrier_gateway;
mod carrier_table;
mod contact_directory;
mod email_relay;
mod http_sms;

pub use carrier_gateway::CarrierGatewayChannel;
pub use carrier_table::{CarrierGateway, CarrierRoute, CarrierTable, GatewayAddress};
pub use contact_directory::InMemoryContactDirectory;
pub use email_relay::EmailRelayChannel;
pub use http_sms::HttpSmsChannel;
