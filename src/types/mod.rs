//! Common types for the relay.
//!
//! Defines the inbound event delivered by the host and the severity scale
//! used for filtering and coloring.

use crate::text::has_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub mod message;

pub use message::*;

/// Opaque identifier of an event in the originating event store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Create a new event ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogEventLevel {
    /// Tracing detail
    Verbose,
    /// Internal diagnostics
    Debug,
    /// Normal operation
    Information,
    /// Degraded or unexpected
    Warning,
    /// Failed operation
    Error,
    /// Unrecoverable failure
    Fatal,
}

impl LogEventLevel {
    /// All levels in ascending severity
    pub const ALL: [LogEventLevel; 6] = [
        LogEventLevel::Verbose,
        LogEventLevel::Debug,
        LogEventLevel::Information,
        LogEventLevel::Warning,
        LogEventLevel::Error,
        LogEventLevel::Fatal,
    ];

    /// Display name, as shown in the exception attachment
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEventLevel::Verbose => "Verbose",
            LogEventLevel::Debug => "Debug",
            LogEventLevel::Information => "Information",
            LogEventLevel::Warning => "Warning",
            LogEventLevel::Error => "Error",
            LogEventLevel::Fatal => "Fatal",
        }
    }

    /// Level for a numeric ordinal (`0` = Verbose ... `5` = Fatal)
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl fmt::Display for LogEventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event level '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogEventLevel {
    type Err = ParseLevelError;

    /// Accepts an exact level name or its ordinal, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Some(level) = Self::ALL.iter().find(|l| l.as_str() == token) {
            return Ok(*level);
        }
        token
            .parse::<u8>()
            .ok()
            .and_then(Self::from_ordinal)
            .ok_or_else(|| ParseLevelError(token.to_string()))
    }
}

/// One event delivered by the host for relaying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    /// Event identifier in the event store
    pub id: EventId,
    /// Severity
    pub level: LogEventLevel,
    /// Message template rendered with its properties
    #[serde(default)]
    pub rendered_message: String,
    /// Exception text, if the event carries one
    #[serde(default)]
    pub exception: Option<String>,
    /// Structured properties, in event order
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl IncomingEvent {
    /// Create an event with a rendered message and nothing else
    pub fn new(id: impl Into<EventId>, level: LogEventLevel, rendered_message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            rendered_message: rendered_message.into(),
            exception: None,
            properties: None,
        }
    }

    /// Attach exception text
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Add a structured property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Exception text when present and not blank
    pub fn exception_text(&self) -> Option<&str> {
        self.exception.as_deref().filter(|e| has_value(e))
    }

    /// Number of structured properties
    pub fn property_count(&self) -> usize {
        self.properties.as_ref().map(|p| p.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("Warning", Some(LogEventLevel::Warning) ; "exact name")]
    #[test_case(" Error ", Some(LogEventLevel::Error) ; "trimmed name")]
    #[test_case("0", Some(LogEventLevel::Verbose) ; "ordinal zero")]
    #[test_case("5", Some(LogEventLevel::Fatal) ; "ordinal five")]
    #[test_case("6", None ; "ordinal out of range")]
    #[test_case("warning", None ; "names are case sensitive")]
    #[test_case("Warn", None ; "abbreviation")]
    #[test_case("", None ; "empty")]
    fn test_parse_level(input: &str, expected: Option<LogEventLevel>) {
        assert_eq!(input.parse::<LogEventLevel>().ok(), expected);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogEventLevel::Verbose < LogEventLevel::Debug);
        assert!(LogEventLevel::Error < LogEventLevel::Fatal);
        assert_eq!(LogEventLevel::ALL.iter().max(), Some(&LogEventLevel::Fatal));
    }

    #[test]
    fn test_event_deserialize() {
        let event: IncomingEvent = serde_json::from_value(json!({
            "id": "event-42",
            "level": "Error",
            "renderedMessage": "Disk full on /var",
            "properties": { "Host": "db1", "FreeBytes": 0 }
        }))
        .unwrap();

        assert_eq!(event.id.as_str(), "event-42");
        assert_eq!(event.level, LogEventLevel::Error);
        assert_eq!(event.exception_text(), None);
        assert_eq!(event.property_count(), 2);

        let keys: Vec<&str> = event
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["Host", "FreeBytes"]);
    }

    #[test]
    fn test_empty_exception_is_absent() {
        let event = IncomingEvent::new("e1", LogEventLevel::Warning, "x").with_exception("");
        assert_eq!(event.exception_text(), None);

        let event = event.with_exception(" \r\n");
        assert_eq!(event.exception_text(), None);
    }
}
