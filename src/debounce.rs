//! Debounced search evaluation.
//!
//! Search input arrives in bursts (keystrokes, pasted lines). A [`Debouncer`]
//! holds at most one pending evaluation: every new input aborts the pending
//! task and schedules a fresh one, so only the last input of a burst is
//! evaluated, once the input has been quiet for the configured delay.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::search::SearchMode;
use crate::session::ChatSession;

/// Default quiet period before a search runs.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Session shared between the input loop and debounced evaluations.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Single-flight, latest-wins scheduler for delayed work.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period before scheduled work runs.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period, cancelling anything still pending.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            trace!("Superseded pending evaluation");
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    /// Cancel the pending task. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether scheduled work has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Callback invoked with the session after each debounced evaluation.
pub type SearchListener = Arc<dyn Fn(&ChatSession) + Send + Sync>;

/// Search input handler that evaluates only the latest query of a burst.
///
/// The query waiting to run lives in one shared slot. Whoever takes it
/// (the scheduled task or [`DebouncedSearch::flush`]) evaluates it, so a
/// query never runs twice.
pub struct DebouncedSearch {
    session: SharedSession,
    debouncer: Debouncer,
    mode: SearchMode,
    listener: SearchListener,
    latest: Arc<Mutex<Option<String>>>,
}

impl DebouncedSearch {
    /// Create a handler for `session`; `listener` sees every evaluation.
    pub fn new(
        session: SharedSession,
        delay: Duration,
        mode: SearchMode,
        listener: impl Fn(&ChatSession) + Send + Sync + 'static,
    ) -> Self {
        Self {
            session,
            debouncer: Debouncer::new(delay),
            mode,
            listener: Arc::new(listener),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Feed one input event. A blank query clears the search when it fires.
    pub fn input(&mut self, query: impl Into<String>) {
        *self.latest.lock() = Some(query.into());
        let latest = Arc::clone(&self.latest);
        let session = Arc::clone(&self.session);
        let listener = Arc::clone(&self.listener);
        let mode = self.mode;

        self.debouncer
            .schedule(move || {
                run_latest(&latest, &session, mode, &listener);
            });
    }

    /// Run the pending evaluation now instead of waiting for the quiet period.
    ///
    /// Returns whether this call evaluated anything. If the scheduled task is
    /// already evaluating, this waits for it and returns `false`.
    pub fn flush(&mut self) -> bool {
        self.debouncer.cancel();
        run_latest(&self.latest, &self.session, self.mode, &self.listener)
    }

    /// Drop any pending evaluation.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel();
        self.latest.lock().take().is_some()
    }

    /// Whether an evaluation is waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.latest.lock().is_some()
    }
}

/// Evaluate the waiting query, if any. The slot stays locked until the
/// listener returns.
fn run_latest(
    latest: &Mutex<Option<String>>,
    session: &SharedSession,
    mode: SearchMode,
    listener: &SearchListener,
) -> bool {
    let mut slot = latest.lock();
    match slot.take() {
        Some(query) => {
            evaluate(session, &query, mode, listener);
            true
        }
        None => false,
    }
}

fn evaluate(session: &SharedSession, query: &str, mode: SearchMode, listener: &SearchListener) {
    let mut guard = session.lock();
    if query.trim().is_empty() {
        guard.clear_search();
    } else {
        guard.search(query, mode);
    }
    listener(&guard);
}
