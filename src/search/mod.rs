//! Search over the merged timeline.
//!
//! A search produces two things:
//! - the filtered view: positions of the messages that satisfy the chosen
//!   [`SearchMode`], in timeline order;
//! - the match list used for navigation: positions in the *unfiltered*
//!   timeline that satisfy the [`SearchMode::Both`] predicate, whatever mode
//!   was used for filtering.
//!
//! Matching is case-insensitive substring matching on content and sender,
//! plus date matching (see [`matches_date_search`]).
//!
//! Partial date queries match any substring of the `YYYY-MM-DD` form of the
//! UTC date, so `"02"` matches the second day of any month, February of any
//! year, and years such as 2002.

mod date;

pub use date::{matches_date_search, Clock, FixedClock, SystemClock};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Message;

/// Which fields a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SearchMode {
    /// Content and sender name.
    Text,
    /// Timestamp keywords, ISO dates, and the display date.
    Date,
    /// Union of text and date matching.
    #[default]
    Both,
}

impl SearchMode {
    /// Parse a mode name; unrecognized names fall back to [`SearchMode::Text`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" => Self::Date,
            "both" => Self::Both,
            _ => Self::Text,
        }
    }

    /// Mode name as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Both => "both",
        }
    }
}

impl FromStr for SearchMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for SearchMode {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for match navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the previous match, wrapping to the last.
    Previous,
    /// Towards the next match, wrapping to the first.
    Next,
}

/// Whether `message` satisfies `mode` for an already lowercased `term`.
#[must_use]
pub fn message_matches(term: &str, message: &Message, mode: SearchMode, today: NaiveDate) -> bool {
    match mode {
        SearchMode::Text => matches_text(term, message),
        SearchMode::Date => matches_date(term, message, today),
        SearchMode::Both => matches_text(term, message) || matches_date(term, message, today),
    }
}

fn matches_text(term: &str, message: &Message) -> bool {
    message.content.to_lowercase().contains(term)
        || message
            .sender_name
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(term))
}

fn matches_date(term: &str, message: &Message, today: NaiveDate) -> bool {
    matches_date_search(term, message, today) || message.display_date().to_lowercase().contains(term)
}

/// Result of evaluating one query over a timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Positions of the messages passing the mode's filter.
    pub filtered: Vec<usize>,
    /// Positions of every `Both`-mode match, strictly increasing.
    pub matches: Vec<usize>,
}

/// Evaluates queries against a message slice.
#[derive(Clone)]
pub struct SearchEngine {
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("today", &self.clock.today())
            .finish()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Engine that resolves `today` from the local system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Engine with a custom clock.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    /// Evaluate `query` under `mode`.
    ///
    /// The query is trimmed and lowercased. An empty query filters nothing out
    /// and matches nothing.
    #[must_use]
    pub fn evaluate(&self, query: &str, mode: SearchMode, messages: &[Message]) -> SearchResults {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return SearchResults {
                filtered: (0..messages.len()).collect(),
                matches: Vec::new(),
            };
        }

        let today = self.clock.today();
        let mut results = SearchResults::default();

        for (i, message) in messages.iter().enumerate() {
            let both = message_matches(&term, message, SearchMode::Both, today);
            let shown = match mode {
                SearchMode::Both => both,
                // Both is a superset of either mode, so a miss there is a miss here.
                other => both && message_matches(&term, message, other, today),
            };
            if shown {
                results.filtered.push(i);
            }
            if both {
                results.matches.push(i);
            }
        }

        debug!(
            %mode,
            filtered = results.filtered.len(),
            matches = results.matches.len(),
            total = messages.len(),
            "Evaluated search"
        );
        results
    }
}

/// Search state of a session: active query, filter, matches and cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: Option<String>,
    mode: SearchMode,
    filtered: Vec<usize>,
    matches: Vec<usize>,
    cursor: Option<usize>,
}

impl SearchState {
    /// State with no active search, showing all `len` messages.
    #[must_use]
    pub fn cleared(len: usize) -> Self {
        Self {
            filtered: (0..len).collect(),
            ..Self::default()
        }
    }

    /// Install the results of a search; the cursor moves to the first match.
    pub fn apply(&mut self, query: &str, mode: SearchMode, results: SearchResults) {
        self.query = Some(query.trim().to_string());
        self.mode = mode;
        self.cursor = if results.matches.is_empty() { None } else { Some(0) };
        self.filtered = results.filtered;
        self.matches = results.matches;
    }

    /// Drop the active search and show all `len` messages.
    pub fn clear(&mut self, len: usize) {
        *self = Self::cleared(len);
    }

    /// Trimmed active query, if a search is active.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Mode used for the active filter.
    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Whether a search is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.query.is_some()
    }

    /// Positions of the displayed messages.
    #[must_use]
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Positions of all matches in the unfiltered timeline.
    #[must_use]
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Index into [`matches`](Self::matches) of the current match; `None` when
    /// there are no matches.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Timeline position of the current match.
    #[must_use]
    pub fn current_position(&self) -> Option<usize> {
        self.cursor.and_then(|c| self.matches.get(c).copied())
    }

    /// Move the cursor one match in `direction`, wrapping around.
    ///
    /// Does nothing when there are no matches.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let count = self.matches.len();
        if count == 0 {
            return self.cursor;
        }
        let current = self.cursor.unwrap_or(0);
        let next = match direction {
            Direction::Previous => {
                if current == 0 {
                    count - 1
                } else {
                    current - 1
                }
            }
            Direction::Next => {
                if current + 1 >= count {
                    0
                } else {
                    current + 1
                }
            }
        };
        self.cursor = Some(next);
        self.cursor
    }

    /// Navigation status such as `2 of 5`, or `No matches`.
    #[must_use]
    pub fn status(&self) -> String {
        match self.cursor {
            Some(c) if !self.matches.is_empty() => format!("{} of {}", c + 1, self.matches.len()),
            _ => "No matches".to_string(),
        }
    }
}
