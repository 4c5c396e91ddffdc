// File: glowbot-common/src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::platform::ChatSource;

/// A normalized chat message. Both platform sources produce this shape so
/// routing and dispatch never see platform payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub source: ChatSource,
    /// Display name of the author as the platform reports it.
    pub author: String,
    /// Raw message text, untrimmed.
    pub text: String,
    /// Platform message id. Only poll-sourced events carry one; the poller
    /// dedups on it before normalization, push events are never deduped.
    pub message_id: Option<String>,
    pub received_at: DateTime<Utc>,
    /// True when the message was a YouTube Super Chat. Always false for Twitch.
    pub is_super_chat: bool,
}

impl ChatEvent {
    pub fn twitch(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: ChatSource::Twitch,
            author: author.into(),
            text: text.into(),
            message_id: None,
            received_at: Utc::now(),
            is_super_chat: false,
        }
    }

    pub fn youtube(
        author: impl Into<String>,
        text: impl Into<String>,
        message_id: impl Into<String>,
        is_super_chat: bool,
    ) -> Self {
        Self {
            source: ChatSource::YouTube,
            author: author.into(),
            text: text.into(),
            message_id: Some(message_id.into()),
            received_at: Utc::now(),
            is_super_chat,
        }
    }

    /// Leading/trailing whitespace stripped. Routing operates on this view.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}
