//! Search command implementation.
//!
//! Loads the threads, runs one query and renders the filtered view with
//! highlights, optionally moving the current match first.

use crate::cli::{AppContext, SearchArgs};
use crate::error::Result;
use crate::search::Direction;
use crate::session::ChatSession;
use crate::view::build_view;

use super::load_session;

/// Run the search command.
pub async fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let mut session = load_session(ctx, &args.paths).await?;
    session.search(&args.query, ctx.mode(args.mode));

    step_matches(&mut session, args.step);

    let view = build_view(&session, &ctx.view_options());
    let mut stdout = std::io::stdout().lock();
    ctx.render(&view, &mut stdout)
}

/// Move the match cursor `step` matches away from the first one.
///
/// Navigation is circular, so only `step` modulo the match count matters.
fn step_matches(session: &mut ChatSession, step: i64) {
    let count = session.search_state().matches().len() as u64;
    if count == 0 {
        return;
    }
    let direction = if step < 0 {
        Direction::Previous
    } else {
        Direction::Next
    };
    for _ in 0..step.unsigned_abs() % count {
        session.navigate(direction);
    }
}
