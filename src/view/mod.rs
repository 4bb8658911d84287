//! Renderable view-models for a session.
//!
//! [`build_view`] turns the session's displayed list, the active query and
//! the match cursor into [`MessageView`]s: whether the sender label is
//! shown, highlighted content segments, and the formatted date. Renderers
//! only ever read these view-models.

use regex::RegexBuilder;
use serde::Serialize;

use crate::model::{Message, ThreadSummary};
use crate::session::ChatSession;

/// Header shown when no thread is loaded.
pub const EMPTY_HEADER: &str = "Chat Viewer";

/// Header shown for a single untitled thread.
pub const UNTITLED_HEADER: &str = "Chat";

/// Options that change how messages are presented.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Sender name of the local user; their messages count as sent.
    pub current_user: Option<String>,
}

impl ViewOptions {
    /// Set the current user identity.
    #[must_use]
    pub fn with_current_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = Some(user.into());
        self
    }

    fn is_current_user(&self, message: &Message) -> bool {
        self.current_user.is_some() && message.sender_name == self.current_user
    }
}

/// A run of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment {
    /// Plain content.
    Text(String),
    /// An occurrence of the query.
    Highlight(String),
    /// An occurrence of the query inside the current match.
    CurrentMatch(String),
}

impl Segment {
    /// Text of the segment.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(t) | Self::Highlight(t) | Self::CurrentMatch(t) => t,
        }
    }
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    /// Ingestion sequence number of the message.
    pub seq: u64,
    /// Position in the full timeline.
    pub position: usize,
    /// Sender label text.
    pub sender: String,
    /// Whether the sender label is shown.
    pub show_sender: bool,
    /// Whether the message was sent by the current user.
    pub is_sent: bool,
    /// Whether this message is the current match.
    pub is_current: bool,
    /// Content, split into plain and highlighted runs.
    pub segments: Vec<Segment>,
    /// Formatted date, empty without a timestamp.
    pub date: String,
    /// Title of the owning thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_title: Option<String>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationView {
    /// Header title.
    pub title: String,
    /// Displayed messages.
    pub messages: Vec<MessageView>,
    /// Active query, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Navigation status while a search is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ConversationView {
    /// Whether there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Build the view of `session`.
///
/// The displayed list is the filtered list, or the full timeline when the
/// filtered list is empty.
#[must_use]
pub fn build_view(session: &ChatSession, options: &ViewOptions) -> ConversationView {
    let state = session.search_state();
    let filtered = session.filtered_messages();
    let displayed: Vec<&Message> = if filtered.is_empty() {
        session.all_messages().iter().collect()
    } else {
        filtered
    };

    let query = state.query().filter(|q| !q.is_empty());
    let current = state.current_position();
    let timeline = session.timeline();

    let mut previous_sender: Option<&Option<String>> = None;
    let mut messages = Vec::with_capacity(displayed.len());

    for message in displayed {
        let Some(position) = timeline.position_of(message.seq) else {
            continue;
        };
        let is_sent = options.is_current_user(message);
        let show_sender = !is_sent && previous_sender != Some(&message.sender_name);
        previous_sender = Some(&message.sender_name);

        let is_current = current == Some(position);
        messages.push(MessageView {
            seq: message.seq,
            position,
            sender: message.sender().to_string(),
            show_sender,
            is_sent,
            is_current,
            segments: highlight(&message.content, query, is_current),
            date: message.display_date(),
            thread_title: message.thread_title.as_deref().map(str::to_string),
        });
    }

    ConversationView {
        title: header_title(session.threads()),
        messages,
        query: query.map(str::to_string),
        status: state.is_active().then(|| state.status()),
    }
}

/// Split `content` into segments, highlighting every case-insensitive
/// occurrence of `query`.
#[must_use]
pub fn highlight(content: &str, query: Option<&str>, is_current: bool) -> Vec<Segment> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return vec![Segment::Text(content.to_string())];
    };
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return vec![Segment::Text(content.to_string())];
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(content) {
        if found.start() > last {
            segments.push(Segment::Text(content[last..found.start()].to_string()));
        }
        let text = found.as_str().to_string();
        segments.push(if is_current {
            Segment::CurrentMatch(text)
        } else {
            Segment::Highlight(text)
        });
        last = found.end();
    }
    if last < content.len() || segments.is_empty() {
        segments.push(Segment::Text(content[last..].to_string()));
    }
    segments
}

/// Header title for the loaded threads.
#[must_use]
pub fn header_title(threads: &[ThreadSummary]) -> String {
    match threads {
        [] => EMPTY_HEADER.to_string(),
        [single] => single
            .title
            .as_deref()
            .unwrap_or(UNTITLED_HEADER)
            .to_string(),
        many => format!("{} Conversations", many.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Direction, SearchMode};
    use pretty_assertions::assert_eq;

    const THREAD: &str = r#"{"title":"Trip","messages":[
        {"sender_name":"ana","content":"Pack the tent","timestamp_ms":1705320000000},
        {"sender_name":"ana","content":"and the TENT poles","timestamp_ms":1705320060000},
        {"sender_name":"me","content":"tent is packed","timestamp_ms":1705320120000},
        {"sender_name":"ana","content":"great","timestamp_ms":1705320180000}]}"#;

    fn session() -> ChatSession {
        let mut session = ChatSession::new();
        session.import_files([("trip.json", THREAD)]);
        session
    }

    fn labels(view: &ConversationView) -> Vec<bool> {
        view.messages.iter().map(|m| m.show_sender).collect()
    }

    #[test]
    fn test_sender_label_runs() {
        let view = build_view(&session(), &ViewOptions::default());
        assert_eq!(labels(&view), vec![true, false, true, true]);
        assert!(view.messages.iter().all(|m| !m.is_sent));
    }

    #[test]
    fn test_current_user_never_labelled() {
        let options = ViewOptions::default().with_current_user("me");
        let view = build_view(&session(), &options);

        assert_eq!(labels(&view), vec![true, false, false, true]);
        assert!(view.messages[2].is_sent);
    }

    #[test]
    fn test_highlight_segments() {
        let segments = highlight("Pack the tent, TENT!", Some("tent"), false);
        assert_eq!(
            segments,
            vec![
                Segment::Text("Pack the ".to_string()),
                Segment::Highlight("tent".to_string()),
                Segment::Text(", ".to_string()),
                Segment::Highlight("TENT".to_string()),
                Segment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_highlight_escapes_query() {
        let segments = highlight("cost: $5 (approx)", Some("(approx)"), true);
        assert_eq!(segments.last(), Some(&Segment::CurrentMatch("(approx)".to_string())));

        let plain = highlight("nothing here", Some("zzz"), false);
        assert_eq!(plain, vec![Segment::Text("nothing here".to_string())]);
    }

    #[test]
    fn test_current_match_follows_cursor() {
        let mut session = session();
        session.search("tent", SearchMode::Both);
        let view = build_view(&session, &ViewOptions::default());

        assert_eq!(view.status.as_deref(), Some("1 of 3"));
        assert!(view.messages[0].is_current);
        assert!(matches!(view.messages[0].segments[1], Segment::CurrentMatch(_)));
        assert!(matches!(view.messages[1].segments[1], Segment::Highlight(_)));

        session.navigate(Direction::Previous);
        let view = build_view(&session, &ViewOptions::default());
        assert_eq!(view.status.as_deref(), Some("3 of 3"));
        assert!(view.messages[2].is_current);
    }

    #[test]
    fn test_empty_filter_shows_full_list() {
        let mut session = session();
        session.search("zzz", SearchMode::Both);
        let view = build_view(&session, &ViewOptions::default());

        assert_eq!(view.messages.len(), 4);
        assert_eq!(view.status.as_deref(), Some("No matches"));
    }

    #[test]
    fn test_header_title() {
        assert_eq!(header_title(&[]), EMPTY_HEADER);
        assert_eq!(build_view(&session(), &ViewOptions::default()).title, "Trip");

        let mut two = ChatSession::new();
        two.import_files([("a.json", r#"{"messages":[]}"#), ("b.json", "{}")]);
        assert_eq!(build_view(&two, &ViewOptions::default()).title, "2 Conversations");

        let mut untitled = ChatSession::new();
        untitled.import_files([("a.json", "{}")]);
        assert_eq!(build_view(&untitled, &ViewOptions::default()).title, UNTITLED_HEADER);
    }

    #[test]
    fn test_view_serializes_segments() {
        let json = serde_json::to_value(Segment::CurrentMatch("x".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "current_match", "text": "x"}));
    }
}
