//! Participants command implementation.

use std::io::Write;

use crate::cli::{AppContext, OutputFormat, ParticipantsArgs};
use crate::error::{Result, ViewerError};

use super::load_session;

/// Run the participants command.
pub async fn run(ctx: &AppContext, args: &ParticipantsArgs) -> Result<()> {
    let session = load_session(ctx, &args.paths).await?;
    let mut stdout = std::io::stdout().lock();

    match ctx.output {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, session.participants()).map_err(|e| {
                ViewerError::Serialization {
                    context: "participants".to_string(),
                    source: e,
                }
            })?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => {
            for name in session.participants() {
                writeln!(stdout, "{name}")?;
            }
        }
    }

    Ok(())
}
