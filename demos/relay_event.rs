//! Relay one event read from stdin.
//!
//! # Usage
//!
//! Configure the relay through the environment:
//! ```bash
//! export ROCKET_API_URL="https://chat.example.com/api/v1"
//! export ROCKET_CHANNEL="alerts"
//! export ROCKET_USERNAME="relay-bot"
//! export ROCKET_PASSWORD="secret"
//! export SEQ_URL="https://seq.example.com"   # optional
//! ```
//!
//! Then pipe an event in:
//! ```bash
//! echo '{"id":"event-1","level":"Error","renderedMessage":"Disk full"}' \
//!     | cargo run --example relay_event
//! ```

use rocketchat_relay::{CycleOutcome, IncomingEvent, Relay, RelayConfig};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let event: IncomingEvent = serde_json::from_str(&input)?;

    let config = RelayConfig::from_env()?;
    println!("Relaying event {} to {}", event.id, config.api_url());

    let relay = Relay::new(config)?;
    match relay.on_event(&event).await {
        CycleOutcome::Posted => println!("Message posted"),
        CycleOutcome::FilteredOut(reason) => println!("Event skipped: {:?}", reason),
        CycleOutcome::Failed { step, message, .. } => {
            println!("Relay failed at '{}': {}", step, message)
        }
    }

    Ok(())
}
