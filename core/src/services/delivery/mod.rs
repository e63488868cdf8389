//! Delivery fallback chain for one-time codes
//!
//! Channels are tried in order until one accepts the code. A messaging-app
//! deep link is always prepared when the recipient's phone is known, so the
//! user has a manual path even when every automatic channel fails.

mod chain;
mod deep_link;
mod traits;
mod types;

pub use chain::DeliveryChain;
pub use deep_link::DeepLinkBuilder;
pub use traits::{ContactDirectory, DeliveryChannel};
pub use types::{DeliveryOutcome, DeliveryReport, DeliveryRequest, OutboundCode, RegisteredContact};
