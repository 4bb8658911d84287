//! Show command implementation.
//!
//! Renders the merged timeline of all loaded threads.

use crate::cli::{AppContext, ShowArgs};
use crate::error::Result;
use crate::view::build_view;

use super::load_session;

/// Run the show command.
pub async fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let session = load_session(ctx, &args.paths).await?;
    let view = build_view(&session, &ctx.view_options());

    let mut stdout = std::io::stdout().lock();
    ctx.render(&view, &mut stdout)
}
