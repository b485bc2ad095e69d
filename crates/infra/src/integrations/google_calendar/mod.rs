//! Google Calendar integration.
//!
//! Split into credential resolution (stored ciphertexts -> fresh access
//! token) and the events client implementing the `CalendarGateway` port.

pub mod client;
pub mod credentials;
pub mod types;

pub use client::GoogleCalendarClient;
pub use credentials::{CredentialResolver, GoogleOAuthSettings};
