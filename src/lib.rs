//! chatlog-viewer: browse and search exported chat thread archives.
//!
//! Thread files are JSON documents with a title, a participant list and a
//! list of messages. Any number of them can be loaded into one session; their
//! messages are merged into a single timeline ordered by timestamp and can be
//! searched by text, by date, or both.
//!
//! # Features
//!
//! - **Merged timeline**: messages from every loaded thread, stably sorted
//! - **Text and date search**: `today`, `yesterday`, `YYYY-MM-DD`, fragments
//! - **Match navigation**: circular next/previous over all matches
//! - **Per-file import report**: one broken file doesn't hide the rest
//! - **Lossless**: unknown fields are kept alongside each message
//!
//! # Quick Start
//!
//! ```rust
//! use chatlog_viewer::prelude::*;
//!
//! let mut session = ChatSession::new();
//! let report = session.import_files([(
//!     "message_1.json",
//!     r#"{"title":"Trip","messages":[
//!         {"sender_name":"Ana","content":"Tickets booked","timestamp_ms":1705320000000},
//!         {"sender_name":"Bo","content":"Nice!","timestamp_ms":1705320060000}]}"#,
//! )]);
//! assert!(report.is_complete());
//!
//! session.search("tickets", SearchMode::Text);
//! let view = build_view(&session, &ViewOptions::default());
//! assert_eq!(view.title, "Trip");
//! assert_eq!(view.status.as_deref(), Some("1 of 1"));
//! ```
//!
//! # Architecture
//!
//! - [`model`]: Thread and message types
//! - [`parser`]: Thread document parsing and participant registration
//! - [`timeline`]: Merged, sorted message list
//! - [`search`]: Text/date matching, filtering and match navigation
//! - [`session`]: Session state and batch import
//! - [`async_io`]: Async file loading and directory expansion
//! - [`debounce`]: Latest-wins delayed search evaluation
//! - [`view`]: Renderable view-models (labels, highlights, dates)
//! - [`render`]: Text and JSON output
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

#![doc(html_root_url = "https://docs.rs/chatlog-viewer/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod async_io;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod search;
pub mod session;
pub mod timeline;
pub mod view;

// Re-export commonly used types at the crate root
pub use error::{Result, ViewerError};
pub use session::ChatSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, ViewerError};
    pub use crate::model::{Message, Thread, ThreadSummary};
    pub use crate::search::{Direction, SearchMode};
    pub use crate::session::{ChatSession, FileOutcome, ImportPolicy, ImportReport};
    pub use crate::view::{build_view, ConversationView, ViewOptions};
}
