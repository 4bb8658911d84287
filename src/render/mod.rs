//! Terminal output for conversation views.
//!
//! - [`TextRenderer`]: human-readable transcript, optionally styled with
//!   `console`. Without color, highlights are bracketed: `[term]` for a
//!   highlight and `[[term]]` for the current match.
//! - [`JsonRenderer`]: the view-model as JSON.

use std::io::Write;

use console::Style;

use crate::error::{Result, ViewerError};
use crate::view::{ConversationView, MessageView, Segment};

/// Shown when a session has no messages.
pub const NO_MESSAGES: &str = "No messages to display";

/// Common interface for view renderers.
pub trait Renderer {
    /// Write `view` to `writer`.
    fn render<W: Write>(&self, view: &ConversationView, writer: &mut W) -> Result<()>;

    /// Render into a string.
    fn render_to_string(&self, view: &ConversationView) -> Result<String> {
        let mut buf = Vec::new();
        self.render(view, &mut buf)?;
        String::from_utf8(buf).map_err(|e| ViewerError::io("rendering view", std::io::Error::other(e)))
    }
}

/// Plain text transcript renderer.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    color: bool,
    show_thread_titles: bool,
    sender: Style,
    date: Style,
    highlight: Style,
    current: Style,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    /// Renderer without color.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: false,
            show_thread_titles: false,
            sender: Style::new().bold().force_styling(true),
            date: Style::new().dim().force_styling(true),
            highlight: Style::new().black().on_yellow().force_styling(true),
            current: Style::new().black().on_color256(208).bold().force_styling(true),
        }
    }

    /// Enable or disable ANSI styling.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Append the thread title to sender labels.
    #[must_use]
    pub fn with_thread_titles(mut self, show: bool) -> Self {
        self.show_thread_titles = show;
        self
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn content(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|segment| match (segment, self.color) {
                (Segment::Text(t), _) => t.clone(),
                (Segment::Highlight(t), true) => self.highlight.apply_to(t).to_string(),
                (Segment::CurrentMatch(t), true) => self.current.apply_to(t).to_string(),
                (Segment::Highlight(t), false) => format!("[{t}]"),
                (Segment::CurrentMatch(t), false) => format!("[[{t}]]"),
            })
            .collect()
    }

    fn write_message<W: Write>(&self, message: &MessageView, writer: &mut W) -> Result<()> {
        if message.show_sender {
            let label = match (&message.thread_title, self.show_thread_titles) {
                (Some(title), true) => format!("{} ({title})", message.sender),
                _ => message.sender.clone(),
            };
            writeln!(writer, "{}", self.paint(&self.sender, &label))?;
        }

        let marker = if message.is_sent { ">" } else { " " };
        let mut line = format!("{marker} {}", self.content(&message.segments));
        if !message.date.is_empty() {
            line.push_str("  ");
            line.push_str(&self.paint(&self.date, &message.date));
        }
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn render<W: Write>(&self, view: &ConversationView, writer: &mut W) -> Result<()> {
        writeln!(writer, "== {} ==", view.title)?;
        if let (Some(query), Some(status)) = (&view.query, &view.status) {
            writeln!(writer, "search: {query} ({status})")?;
        }

        if view.is_empty() {
            writeln!(writer, "{NO_MESSAGES}")?;
            return Ok(());
        }

        for message in &view.messages {
            self.write_message(message, writer)?;
        }
        Ok(())
    }
}

/// JSON renderer.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Create a renderer; `pretty` selects indented output.
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Renderer for JsonRenderer {
    fn render<W: Write>(&self, view: &ConversationView, writer: &mut W) -> Result<()> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, view)
        } else {
            serde_json::to_writer(&mut *writer, view)
        };
        result.map_err(|e| ViewerError::Serialization {
            context: "conversation view".to_string(),
            source: e,
        })?;
        writeln!(writer)?;
        Ok(())
    }
}
