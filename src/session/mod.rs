//! Viewer session: the single owner of all import and search state.
//!
//! A [`ChatSession`] holds the merged [`Timeline`], the participant set, and
//! the active [`SearchState`]. Each import batch starts from a clean session,
//! processes files one at a time (parse, then merge, then the next file), and
//! finally resets the filtered view to the full timeline.
//!
//! # Example
//!
//! ```rust
//! use chatlog_viewer::search::{Direction, SearchMode};
//! use chatlog_viewer::session::ChatSession;
//!
//! let mut session = ChatSession::new();
//! let report = session.import_files([(
//!     "trip.json",
//!     r#"{"messages":[{"sender_name":"A","content":"hi","timestamp_ms":200},
//!                    {"sender_name":"B","content":"yo","timestamp_ms":100}]}"#,
//! )]);
//! assert!(report.is_complete());
//!
//! let outcome = session.search("hi", SearchMode::Both);
//! assert_eq!(outcome.matches, &[1]);
//! assert_eq!(session.navigate(Direction::Next), Some(0));
//! ```

mod report;

pub use report::{FileOutcome, ImportPolicy, ImportReport};

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::async_io;
use crate::error::Result;
use crate::model::{Message, ParticipantSet, ThreadSummary};
use crate::parser::ThreadParser;
use crate::search::{Direction, SearchEngine, SearchMode, SearchState};
use crate::timeline::Timeline;

/// Options fixed for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// What to do with the rest of a batch after a file fails.
    pub policy: ImportPolicy,
    /// Maximum thread document size in bytes (0 = unlimited).
    pub max_file_size: u64,
}

/// What a search hands back to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome<'a> {
    /// Messages passing the filter, in timeline order.
    pub filtered: Vec<&'a Message>,
    /// Positions of all matches in the unfiltered timeline.
    pub matches: &'a [usize],
    /// Index of the current match in `matches`.
    pub cursor: Option<usize>,
}

/// State of one viewer session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    timeline: Timeline,
    search: SearchState,
    engine: SearchEngine,
    options: SessionOptions,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Empty session with default options and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    /// Empty session with the given options.
    #[must_use]
    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            timeline: Timeline::new(),
            search: SearchState::default(),
            engine: SearchEngine::new(),
            options,
        }
    }

    /// Replace the search engine (e.g. to pin the clock).
    #[must_use]
    pub fn with_engine(mut self, engine: SearchEngine) -> Self {
        self.engine = engine;
        self
    }

    /// All messages in timeline order.
    #[must_use]
    pub fn all_messages(&self) -> &[Message] {
        self.timeline.messages()
    }

    /// Messages of the current filtered view, in timeline order.
    #[must_use]
    pub fn filtered_messages(&self) -> Vec<&Message> {
        let all = self.timeline.messages();
        self.search.filtered().iter().filter_map(|&i| all.get(i)).collect()
    }

    /// Participants registered by the current batch.
    #[must_use]
    pub fn participants(&self) -> &ParticipantSet {
        self.timeline.participants()
    }

    /// Threads merged by the current batch.
    #[must_use]
    pub fn threads(&self) -> &[ThreadSummary] {
        self.timeline.threads()
    }

    /// The merged timeline.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Active search state.
    #[must_use]
    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Clear all threads, messages, participants and search state.
    pub fn reset(&mut self) {
        self.timeline.clear();
        self.search = SearchState::default();
        debug!("Session reset");
    }

    /// Import a batch of `(name, raw_text)` files.
    ///
    /// The session is reset first. Files are parsed and merged in order; a
    /// failing file is reported in the returned [`ImportReport`], and the
    /// [`ImportPolicy`] decides whether the remaining files are still loaded.
    #[instrument(skip_all)]
    pub fn import_files<I, N, T>(&mut self, files: I) -> ImportReport
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        self.reset();
        let mut parser = self.parser();
        let mut report = ImportReport::default();

        for (name, text) in files {
            let name = name.into();
            if report.is_aborted() {
                report.push(FileOutcome::Skipped { file: name });
                continue;
            }
            let outcome = self.ingest(&mut parser, name, Ok(text.as_ref()));
            self.record(&mut report, outcome);
        }

        self.finish_batch(&report, &parser);
        report
    }

    /// Import a batch of files from disk.
    ///
    /// Reads are asynchronous and strictly sequential: each file is read,
    /// parsed and merged before the next read starts.
    #[instrument(skip_all, fields(files = paths.len()))]
    pub async fn import_paths(&mut self, paths: &[PathBuf]) -> ImportReport {
        self.reset();
        let mut parser = self.parser();
        let mut report = ImportReport::default();

        for path in paths {
            let name = crate::parser::source_name(path);
            if report.is_aborted() {
                report.push(FileOutcome::Skipped { file: name });
                continue;
            }
            let outcome = match async_io::read_source(path).await {
                Ok(source) => self.ingest(&mut parser, name, Ok(source.text.as_str())),
                Err(e) => self.ingest(&mut parser, name, Err(e)),
            };
            self.record(&mut report, outcome);
        }

        self.finish_batch(&report, &parser);
        report
    }

    /// Run a search and install its results.
    ///
    /// A blank query clears the search instead.
    pub fn search(&mut self, query: &str, mode: SearchMode) -> SearchOutcome<'_> {
        if query.trim().is_empty() {
            self.clear_search();
        } else {
            let results = self.engine.evaluate(query, mode, self.timeline.messages());
            self.search.apply(query, mode, results);
        }
        self.outcome()
    }

    /// Drop the active search; the filtered view becomes the full timeline.
    pub fn clear_search(&mut self) -> Vec<&Message> {
        self.search.clear(self.timeline.len());
        self.filtered_messages()
    }

    /// Move the match cursor. No-op when there are no matches.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        self.search.navigate(direction)
    }

    fn outcome(&self) -> SearchOutcome<'_> {
        SearchOutcome {
            filtered: self.filtered_messages(),
            matches: self.search.matches(),
            cursor: self.search.cursor(),
        }
    }

    fn parser(&self) -> ThreadParser {
        ThreadParser::new().with_max_file_size(self.options.max_file_size)
    }

    /// Parse and merge one file.
    fn ingest(
        &mut self,
        parser: &mut ThreadParser,
        name: String,
        text: Result<&str>,
    ) -> FileOutcome {
        let thread = text.and_then(|text| parser.parse_str(text, &name, self.timeline.participants_mut()));
        match thread {
            Ok(thread) => {
                let summary = self.timeline.extend_from_thread(thread);
                FileOutcome::Imported {
                    file: name,
                    messages: summary.message_count,
                    dropped: summary.dropped_count,
                }
            }
            Err(error) => {
                warn!(file = %name, error = %error, "Failed to import file");
                FileOutcome::Failed { file: name, error }
            }
        }
    }

    fn record(&self, report: &mut ImportReport, outcome: FileOutcome) {
        let abort = match &outcome {
            FileOutcome::Failed { error, .. } => {
                self.options.policy == ImportPolicy::Abort || !error.is_recoverable()
            }
            _ => false,
        };
        report.push(outcome);
        if abort {
            report.abort();
        }
    }

    fn finish_batch(&mut self, report: &ImportReport, parser: &ThreadParser) {
        self.search.clear(self.timeline.len());
        let stats = parser.stats();
        debug!(
            parsed = stats.threads_parsed,
            rejected = stats.threads_failed,
            entries = stats.messages_seen,
            new_participants = stats.participants_registered,
            "Parser statistics"
        );
        info!(
            imported = report.imported_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            messages = self.timeline.len(),
            participants = self.timeline.participants().len(),
            "Import batch finished"
        );
    }
}
