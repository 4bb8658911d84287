//! Message types.
//!
//! [`RawMessage`] is a message entry exactly as the thread file carries it.
//! [`Message`] is what the timeline holds after ingestion: blank entries are
//! gone, provenance is attached, and every message has a unique `seq`.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient_millis, lenient_string, UnknownFields};

/// Sender label used when a message has no sender.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// A message entry as found in a thread file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Author of the message.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    /// Text content; non-string content is treated as absent.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_millis", skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,

    /// Unknown fields (reactions, photos, share links, ...).
    #[serde(flatten)]
    pub extra: UnknownFields,
}

impl RawMessage {
    /// Whether this entry carries displayable text.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// A message in the merged timeline. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Ingestion sequence number, unique within a session.
    pub seq: u64,
    /// Author of the message, if the file named one.
    pub sender_name: Option<String>,
    /// Non-blank text content.
    pub content: String,
    /// Epoch milliseconds, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    /// Title of the owning thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_title: Option<Arc<str>>,
    /// Source file of the owning thread.
    pub thread_source_file: Arc<str>,
    /// Unknown fields carried over from the raw entry.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

impl Message {
    /// Ingest a raw entry. Returns `None` when the content is absent or blank.
    #[must_use]
    pub fn from_raw(
        raw: RawMessage,
        seq: u64,
        thread_title: Option<Arc<str>>,
        thread_source_file: Arc<str>,
    ) -> Option<Self> {
        if !raw.has_content() {
            return None;
        }
        Some(Self {
            seq,
            sender_name: raw.sender_name,
            content: raw.content.unwrap_or_default(),
            timestamp_ms: raw.timestamp_ms,
            thread_title,
            thread_source_file,
            extra: raw.extra,
        })
    }

    /// Sender name for display.
    #[must_use]
    pub fn sender(&self) -> &str {
        self.sender_name.as_deref().unwrap_or(UNKNOWN_SENDER)
    }

    /// Ordering key for the timeline: absent timestamps sort as 0.
    #[must_use]
    pub fn sort_key(&self) -> i64 {
        self.timestamp_ms.unwrap_or(0)
    }

    /// Timestamp as a UTC instant.
    ///
    /// A zero timestamp counts as absent, like a missing one.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp_ms
            .filter(|&ms| ms != 0)
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Timestamp in the local time zone.
    #[must_use]
    pub fn local_timestamp(&self) -> Option<DateTime<Local>> {
        self.timestamp().map(|ts| ts.with_timezone(&Local))
    }

    /// Display date such as `Jan 5, 2024`, or an empty string without a timestamp.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.local_timestamp()
            .map(|ts| ts.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }
}
