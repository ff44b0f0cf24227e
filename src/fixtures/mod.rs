//! Test fixtures for relay events and Rocket.Chat API responses.
//!
//! Provides realistic test data for unit tests.

use crate::types::*;
use serde_json::json;

/// Create a fixture event at the given level
pub fn event(level: LogEventLevel) -> IncomingEvent {
    IncomingEvent::new(
        "event-8d8a1b2c3d4e",
        level,
        "Disk usage on db1 reached 97%",
    )
}

/// Create a fixture event with a fresh random id
pub fn unique_event(level: LogEventLevel) -> IncomingEvent {
    let mut event = event(level);
    event.id = EventId::new(format!("event-{}", uuid::Uuid::new_v4().simple()));
    event
}

/// Create a fixture error event carrying an exception
pub fn error_event() -> IncomingEvent {
    IncomingEvent::new(
        "event-5f6e7d8c9b0a",
        LogEventLevel::Error,
        "Failed to process order 1042",
    )
    .with_exception(
        "System.InvalidOperationException: Order already shipped\r\n   at Orders.Ship(Int32 id)",
    )
}

/// Create a fixture event with structured properties
pub fn event_with_properties() -> IncomingEvent {
    event(LogEventLevel::Warning)
        .with_property("Host", "db1")
        .with_property("UsagePercent", 97)
        .with_property("Mounts", json!(["/", "/var"]))
}

/// Rocket.Chat API response fixtures
pub mod responses {
    use super::*;

    /// Create a successful login response
    pub fn login_success(user_id: &str, auth_token: &str) -> serde_json::Value {
        json!({
            "status": "success",
            "data": {
                "userId": user_id,
                "authToken": auth_token,
                "me": {
                    "_id": user_id,
                    "username": "relay-bot"
                }
            }
        })
    }

    /// Create a rejected login response
    pub fn login_failure() -> serde_json::Value {
        json!({
            "status": "error",
            "error": "Unauthorized",
            "message": "You must be logged in to do this."
        })
    }

    /// Create a chat.postMessage response
    pub fn post_success() -> serde_json::Value {
        json!({
            "success": true,
            "channel": "#alerts",
            "ts": 1729339200000u64,
            "message": {
                "_id": "Fg7Jd2kLm9",
                "rid": "GENERAL",
                "msg": "[Disk usage on db1 reached 97%](https://seq.example.com/)"
            }
        })
    }

    /// Create a refused chat.postMessage response
    pub fn post_failure(error: &str) -> serde_json::Value {
        json!({
            "success": false,
            "error": error
        })
    }
}
