//! Inbound channel messages and their stored form.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Excerpt length used when messages are shown to subscribers.
pub const EXCERPT_CHARS: usize = 200;

/// A raw message event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel: String,
    pub message_id: i64,
    pub text: String,
}

impl InboundMessage {
    pub fn new(channel: impl Into<String>, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message_id,
            text: text.into(),
        }
    }
}

/// Every inbound message is stored, whether or not it carried a price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub message_id: i64,
    pub text: String,
    pub contains_price: bool,
    pub sentiment: Option<f64>,
}

impl MessageRecord {
    pub fn from_inbound(msg: &InboundMessage, timestamp: DateTime<Utc>, contains_price: bool) -> Self {
        Self {
            timestamp,
            channel: msg.channel.clone(),
            message_id: msg.message_id,
            text: msg.text.clone(),
            contains_price,
            sentiment: None,
        }
    }

    /// Truncated view for live updates and narrative prompts.
    pub fn excerpt(&self) -> MessageExcerpt {
        MessageExcerpt {
            timestamp: self.timestamp,
            channel: self.channel.clone(),
            text: truncate_chars(&self.text, EXCERPT_CHARS),
            contains_price: self.contains_price,
        }
    }
}

/// Short form of a stored message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageExcerpt {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub text: String,
    pub contains_price: bool,
}

/// Truncate on character boundaries; Arabic text is multi-byte.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "سعر الدولار";
        assert_eq!(truncate_chars(text, 3), "سعر");
        assert_eq!(truncate_chars(text, 100), text);
        assert_eq!(truncate_chars("", 5), "");
    }
}
