//! Observability helpers for the relay.
//!
//! Provides secret redaction for log output and the per-cycle tracing span.

pub mod logging;
pub mod tracing_utils;

pub use logging::*;
pub use tracing_utils::*;
