//! Thread document parsing.
//!
//! Turns the raw text of one exported thread file into a [`Thread`]. The
//! whole file is one JSON document; a syntax error (or a document whose shape
//! cannot be a thread, such as a top-level array) fails with
//! [`ViewerError::Parse`] naming the file. Nothing is skipped silently.
//!
//! Participant names are registered into the caller's running set while the
//! document is parsed, so they are known even for threads that contribute no
//! messages.
//!
//! # Example
//!
//! ```rust
//! use chatlog_viewer::model::ParticipantSet;
//! use chatlog_viewer::parser::ThreadParser;
//!
//! let mut participants = ParticipantSet::new();
//! let mut parser = ThreadParser::new();
//!
//! let thread = parser.parse_str(
//!     r#"{"title":"Lunch","participants":[{"name":"ana"}],"messages":[]}"#,
//!     "lunch.json",
//!     &mut participants,
//! )?;
//!
//! assert_eq!(thread.display_title(), "Lunch");
//! assert!(participants.contains("ana"));
//! # Ok::<(), chatlog_viewer::ViewerError>(())
//! ```

use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::error::{Result, ViewerError};
use crate::model::{ParticipantSet, RawThread, Thread};

/// Default maximum file size (unlimited).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 0;

/// Parser for exported thread documents.
#[derive(Debug)]
pub struct ThreadParser {
    /// Maximum accepted document size in bytes (0 = unlimited).
    max_file_size: u64,
    /// Statistics about parsing.
    stats: ParseStats,
}

/// Statistics accumulated across the documents a parser has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Documents parsed successfully.
    pub threads_parsed: usize,
    /// Documents rejected.
    pub threads_failed: usize,
    /// Message entries seen, before blank filtering.
    pub messages_seen: usize,
    /// Participant names newly added to the running set.
    pub participants_registered: usize,
}

impl ThreadParser {
    /// Create a new parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            stats: ParseStats::default(),
        }
    }

    /// Set maximum document size in bytes (0 = unlimited).
    #[must_use]
    pub fn with_max_file_size(mut self, max_bytes: u64) -> Self {
        self.max_file_size = max_bytes;
        self
    }

    /// Get parse statistics.
    #[must_use]
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse one thread document.
    ///
    /// `source` identifies the file in errors and in message provenance.
    /// Participant names are added to `participants` as a side effect.
    #[instrument(skip(self, text, participants), fields(source = %source, bytes = text.len()))]
    pub fn parse_str(
        &mut self,
        text: &str,
        source: &str,
        participants: &mut ParticipantSet,
    ) -> Result<Thread> {
        if self.max_file_size > 0 && text.len() as u64 > self.max_file_size {
            self.stats.threads_failed += 1;
            debug!(
                size = %format_bytes(text.len() as u64),
                limit = %format_bytes(self.max_file_size),
                "Thread document exceeds size limit"
            );
            return Err(ViewerError::TooLarge {
                file: source.to_string(),
                size: text.len() as u64,
                limit: self.max_file_size,
            });
        }

        let raw: RawThread = match serde_json::from_str(text) {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.threads_failed += 1;
                debug!(error = %e, preview = %truncate_preview(text, 80), "Rejected thread document");
                return Err(ViewerError::parse(source, e));
            }
        };

        let thread = Thread::from_raw(raw, source);

        for name in &thread.participants {
            if participants.insert(name.clone()) {
                self.stats.participants_registered += 1;
                trace!(participant = %name, "Registered participant");
            }
        }

        self.stats.threads_parsed += 1;
        self.stats.messages_seen += thread.messages.len();

        debug!(
            title = thread.title.as_deref().unwrap_or(""),
            messages = thread.messages.len(),
            participants = thread.participants.len(),
            "Parsed thread"
        );
        Ok(thread)
    }

}

impl Default for ThreadParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Source identifier for a path: its file name, or the full path if it has none.
#[must_use]
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format bytes in a human-readable format.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Truncate a string for preview display, on a character boundary.
fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
