//! Rocket.Chat relay
//!
//! Relays structured log events to a Rocket.Chat channel:
//! - Severity allow-list filtering
//! - Per-event login against the Rocket.Chat REST API
//! - Rich message assembly (deep link, exception and property attachments)
//! - Authenticated `chat.postMessage` delivery
//! - A host boundary that logs failures instead of propagating them
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rocketchat_relay::{IncomingEvent, LogEventLevel, Relay, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::builder()
//!         .api_url("https://chat.example.com/api/v1")?
//!         .seq_url("https://seq.example.com")
//!         .channel("alerts")
//!         .username("relay-bot")
//!         .password("secret")
//!         .build()?;
//!
//!     let relay = Relay::new(config)?;
//!     let event = IncomingEvent::new("event-1", LogEventLevel::Error, "Disk full");
//!
//!     let outcome = relay.on_event(&event).await;
//!     println!("Cycle finished: {:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `rustls` - TLS through rustls (default)
//! - `native-tls` - TLS through the platform library

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod config;
pub mod errors;
pub mod text;
pub mod transport;
pub mod types;

// Pipeline
pub mod assembly;
pub mod filter;
pub mod relay;
pub mod services;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use config::{RelayConfig, RelayConfigBuilder, RelaySettings};
pub use errors::{RelayError, RelayResult};
pub use relay::{CycleOutcome, Delivery, FilterReason, Relay, Step};
pub use types::{ChatMessage, EventId, IncomingEvent, LogEventLevel};

/// Default Rocket.Chat REST API URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1/";

/// Default timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create a relay with the given configuration
pub fn create_relay(config: RelayConfig) -> RelayResult<Relay> {
    Relay::new(config)
}

/// Create a relay from environment variables
///
/// See [`RelayConfig::from_env`] for the variables read.
pub fn create_relay_from_env() -> RelayResult<Relay> {
    let config = RelayConfig::from_env()?;
    create_relay(config)
}
