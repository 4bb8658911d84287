//! Interactive command implementation.
//!
//! Reads one query per line from stdin. Queries are debounced; the view is
//! re-rendered after every evaluation. Lines starting with `:` are commands:
//! `:n` / `:p` move between matches, `:clear` drops the search, `:q` quits.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::cli::{AppContext, InteractiveArgs};
use crate::debounce::DebouncedSearch;
use crate::error::{Result, ViewerError};
use crate::search::Direction;
use crate::session::ChatSession;
use crate::view::build_view;

use super::load_session;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Query(String),
    Navigate(Direction),
    Clear,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            ":q" | ":quit" => Self::Quit,
            ":n" | ":next" => Self::Navigate(Direction::Next),
            ":p" | ":prev" => Self::Navigate(Direction::Previous),
            ":clear" => Self::Clear,
            _ => Self::Query(line.to_string()),
        }
    }
}

fn render(ctx: &AppContext, session: &ChatSession) {
    let view = build_view(session, &ctx.view_options());
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = ctx.render(&view, &mut stdout) {
        warn!(error = %e, "Failed to render view");
    }
}

/// Run the interactive command.
pub async fn run(ctx: &AppContext, args: &InteractiveArgs) -> Result<()> {
    let session = Arc::new(Mutex::new(load_session(ctx, &args.paths).await?));
    let delay = args
        .debounce_ms
        .map_or_else(|| ctx.config.viewer.search_delay(), Duration::from_millis);
    let mode = ctx.mode(args.mode);

    render(ctx, &session.lock());

    let listener_ctx = ctx.clone();
    let mut search = DebouncedSearch::new(Arc::clone(&session), delay, mode, move |s| {
        render(&listener_ctx, s);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ViewerError::io("reading stdin", e))?
    {
        match Input::parse(&line) {
            Input::Quit => {
                search.cancel();
                return Ok(());
            }
            Input::Query(query) => search.input(query),
            Input::Navigate(direction) => {
                search.flush();
                let mut guard = session.lock();
                let cursor = guard.navigate(direction);
                debug!(?cursor, "Moved match cursor");
                render(ctx, &guard);
            }
            Input::Clear => {
                search.cancel();
                let mut guard = session.lock();
                guard.clear_search();
                render(ctx, &guard);
            }
        }
    }

    // End of input: evaluate whatever is still waiting.
    search.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(Input::parse(":q"), Input::Quit);
        assert_eq!(Input::parse(" :n "), Input::Navigate(Direction::Next));
        assert_eq!(Input::parse(":prev"), Input::Navigate(Direction::Previous));
        assert_eq!(Input::parse(":clear"), Input::Clear);
        assert_eq!(Input::parse("lunch"), Input::Query("lunch".to_string()));
        assert_eq!(Input::parse(""), Input::Query(String::new()));
    }
}
