//! Outbound chat message types, serialized with Rocket.Chat field names.

use super::LogEventLevel;
use serde::{Deserialize, Serialize};

/// Title of the attachment carrying structured event properties
pub const PROPERTIES_ATTACHMENT_TITLE: &str = "Structured Event Properties";

/// Attachment color for a severity level
pub fn color_for_level(level: LogEventLevel) -> &'static str {
    match level {
        LogEventLevel::Verbose => "#D3D3D3",
        LogEventLevel::Debug => "#A9A9A9",
        LogEventLevel::Information => "#36A64F",
        LogEventLevel::Warning => "#FFA500",
        LogEventLevel::Error => "#FF0000",
        LogEventLevel::Fatal => "#8B0000",
    }
}

/// Message posted to `chat.postMessage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Target channel, always `#`-prefixed
    pub channel: String,
    /// Primary text
    pub text: String,
    /// Attachments, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    /// Create a message without attachments
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Append an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Message attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Color bar
    pub color: String,
    /// Title
    pub title: String,
    /// Body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Title link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    /// Render collapsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

impl Attachment {
    /// Create an attachment with a color and title
    pub fn new(color: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            title: title.into(),
            text: None,
            title_link: None,
            collapsed: None,
            fields: Vec::new(),
        }
    }

    /// Set body text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set title link
    pub fn title_link(mut self, link: impl Into<String>) -> Self {
        self.title_link = Some(link.into());
        self
    }

    /// Set collapsed
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Append a field
    pub fn field(mut self, field: AttachmentField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Attachment field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    /// Whether short (side-by-side)
    #[serde(default)]
    pub short: bool,
    /// Field title
    pub title: String,
    /// Field value
    pub value: String,
}

impl AttachmentField {
    /// Full-width field
    pub fn wide(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            short: false,
            title: title.into(),
            value: value.into(),
        }
    }
}
