//! Thread documents as they appear on disk, and the parsed [`Thread`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{lenient_string, RawMessage, UnknownFields};

/// Top-level shape of one exported thread file.
///
/// Every field is optional; a document `{}` is a valid, empty thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawThread {
    /// Display name of the conversation.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Participant descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,

    /// Messages in file order (not necessarily chronological).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<RawMessage>>,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

/// A participant descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant name; descriptors without a string name are ignored.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unknown fields for forward compatibility.
    #[serde(flatten)]
    pub extra: UnknownFields,
}

/// A parsed thread, tagged with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Display name of the conversation.
    pub title: Option<Arc<str>>,
    /// Participant names declared by the document.
    pub participants: Vec<String>,
    /// Messages in file order, before blank filtering.
    pub messages: Vec<RawMessage>,
    /// Source identifier (file name) for provenance and error messages.
    pub source_file_name: Arc<str>,
    /// Unknown top-level fields.
    pub extra: UnknownFields,
}

impl Thread {
    /// Build a thread from its raw document and source identifier.
    #[must_use]
    pub fn from_raw(raw: RawThread, source_file_name: impl Into<Arc<str>>) -> Self {
        let participants = raw
            .participants
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();

        Self {
            title: raw.title.map(Arc::from),
            participants,
            messages: raw.messages.unwrap_or_default(),
            source_file_name: source_file_name.into(),
            extra: raw.extra,
        }
    }

    /// Title for display, falling back to "Chat".
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Chat")
    }
}

/// Summary of a thread that has been merged into the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    /// Display name of the conversation.
    pub title: Option<Arc<str>>,
    /// Source identifier.
    pub source_file: Arc<str>,
    /// Messages retained after blank filtering.
    pub message_count: usize,
    /// Messages dropped for blank content.
    pub dropped_count: usize,
}
