mod access_service;
mod chat_relay;
mod license_gate;

pub use access_service::{AccessError, AccessService};
pub use chat_relay::{ChatRelay, ChatRelayError};
pub use license_gate::LicenseGate;
