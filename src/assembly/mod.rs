//! Builds the outbound chat message for an event.
//!
//! Assembly is pure: the same event and configuration always produce the
//! same message.

use crate::config::RelayConfig;
use crate::text::{clean_crlf, has_value, truncate_with_ellipsis};
use crate::types::{
    color_for_level, Attachment, AttachmentField, ChatMessage, EventId, IncomingEvent,
    PROPERTIES_ATTACHMENT_TITLE,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Longest summary, ellipsis included
pub const SUMMARY_MAX_CHARS: usize = 255;

/// Characters left as-is in the deep link filter expression.
const FILTER_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'@')
    .remove(b'\'');

/// Deep link to the event in the event viewer
pub fn event_url(event_link_base: &str, id: &EventId) -> String {
    let filter = format!("@Id = '{}'", id);
    format!(
        "{}#/events?filter={}",
        event_link_base,
        utf8_percent_encode(&filter, FILTER_SET)
    )
}

/// Single-line summary of the rendered message
pub fn summarize(rendered_message: &str) -> String {
    truncate_with_ellipsis(&clean_crlf(rendered_message), SUMMARY_MAX_CHARS)
}

/// Channel name with exactly one leading `#`
pub fn normalize_channel(channel: &str) -> String {
    format!("#{}", channel.trim().trim_start_matches('#'))
}

/// Field value for a structured property: compact JSON, empty for null
fn property_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Assemble the chat message for `event`.
///
/// Attachments are added in a fixed order, each only when it has content:
/// the rendered message, the exception, then the structured properties
/// (when enabled in `config`).
pub fn assemble(event: &IncomingEvent, config: &RelayConfig, event_link_base: &str) -> ChatMessage {
    let url = event_url(event_link_base, &event.id);
    let summary = summarize(&event.rendered_message);
    let color = color_for_level(event.level);

    let mut message = ChatMessage::new(
        normalize_channel(config.channel()),
        format!("[{}]({})", summary, url),
    );

    if has_value(&event.rendered_message) {
        message = message.attachment(
            Attachment::new(color, summary.as_str())
                .text(event.rendered_message.as_str())
                .title_link(url.as_str()),
        );
    }

    if let Some(exception) = event.exception_text() {
        message = message.attachment(
            Attachment::new(color, exception)
                .text(event.level.as_str())
                .title_link(url.as_str()),
        );
    }

    if let Some(properties) = event.properties.as_ref().filter(|p| !p.is_empty()) {
        if config.attach_properties() {
            let attachment = properties.iter().fold(
                Attachment::new(color, PROPERTIES_ATTACHMENT_TITLE)
                    .title_link(url.as_str())
                    .collapsed(true),
                |attachment, (name, value)| {
                    attachment.field(AttachmentField::wide(name.as_str(), property_value(value)))
                },
            );
            message = message.attachment(attachment);
        }
    }

    message
}
