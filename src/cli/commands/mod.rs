//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod interactive;
pub mod participants;
pub mod search;
pub mod show;

use std::path::PathBuf;

use tracing::warn;

use crate::async_io::expand_inputs;
use crate::cli::AppContext;
use crate::error::Result;
use crate::session::ChatSession;

/// Load the given files and directories into a fresh session.
///
/// Failed files are reported on stderr. The load fails as a whole when the
/// batch was aborted or when nothing could be imported.
pub async fn load_session(ctx: &AppContext, inputs: &[PathBuf]) -> Result<ChatSession> {
    let files = expand_inputs(inputs, ctx.config.import.json_only)?;
    let mut session = ChatSession::with_options(ctx.session_options());
    let report = session.import_paths(&files).await;

    for (file, error) in report.failures() {
        warn!(file, %error, "Skipping file");
        eprintln!("Warning: {error}");
    }

    let nothing_loaded = report.imported_count() == 0 && report.failed_count() > 0;
    if report.is_aborted() || nothing_loaded {
        report.into_result()?;
    }

    Ok(session)
}
