//! Tracing helpers for notification cycles.

use crate::types::IncomingEvent;
use tracing::{span, Level, Span};

/// Create the span covering one notification cycle
pub fn create_cycle_span(event: &IncomingEvent) -> Span {
    span!(
        Level::INFO,
        "rocketchat_relay_cycle",
        event.id = %event.id,
        event.level = %event.level,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
        relay.outcome = tracing::field::Empty,
        error.message = tracing::field::Empty,
    )
}

/// Record a successful (or filtered) cycle on its span
pub fn record_success(span: &Span, outcome: &str) {
    span.record("otel.status_code", "OK");
    span.record("relay.outcome", outcome);
}

/// Record a failed cycle on its span
pub fn record_error(span: &Span, error: &str) {
    span.record("otel.status_code", "ERROR");
    span.record("relay.outcome", "failed");
    span.record("error.message", error);
}
