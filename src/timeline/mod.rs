//! The merged message timeline.
//!
//! Threads are flattened into one list ordered by timestamp. Every merge
//! re-sorts the whole accumulated list (stable, so messages with equal or
//! missing timestamps keep their relative order), which keeps the ordering
//! invariant true after each file of a batch, not only at the end.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::model::{Message, ParticipantSet, Thread, ThreadSummary};

/// All messages of an import session, in timeline order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// Messages sorted by [`Message::sort_key`].
    messages: Vec<Message>,
    /// Position of each message by `seq`, rebuilt after every sort.
    positions: HashMap<u64, usize>,
    /// Threads merged so far, in merge order.
    threads: Vec<ThreadSummary>,
    /// Participant names registered by the parser.
    participants: ParticipantSet,
    /// Next sequence number to hand out.
    next_seq: u64,
}

impl Timeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages, sorted ascending by timestamp.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the timeline holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Threads merged so far.
    #[must_use]
    pub fn threads(&self) -> &[ThreadSummary] {
        &self.threads
    }

    /// Participants seen so far.
    #[must_use]
    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    /// Running participant set, for the parser to register names into.
    pub fn participants_mut(&mut self) -> &mut ParticipantSet {
        &mut self.participants
    }

    /// Position of the message with the given sequence number.
    #[must_use]
    pub fn position_of(&self, seq: u64) -> Option<usize> {
        self.positions.get(&seq).copied()
    }

    /// Merge a thread's messages into the timeline.
    ///
    /// Blank messages are dropped, the rest are tagged with the thread's
    /// title and source file, appended, and the whole list is re-sorted.
    /// Returns the summary recorded for the thread.
    #[instrument(skip(self, thread), fields(source = %thread.source_file_name))]
    pub fn extend_from_thread(&mut self, thread: Thread) -> &ThreadSummary {
        let Thread {
            title,
            messages,
            source_file_name,
            ..
        } = thread;

        let total = messages.len();
        let before = self.messages.len();

        for raw in messages {
            if let Some(message) = Message::from_raw(
                raw,
                self.next_seq,
                title.clone(),
                Arc::clone(&source_file_name),
            ) {
                self.next_seq += 1;
                self.messages.push(message);
            }
        }

        let retained = self.messages.len() - before;
        self.resort();

        debug!(
            retained,
            dropped = total - retained,
            total_messages = self.messages.len(),
            "Merged thread into timeline"
        );

        self.threads.push(ThreadSummary {
            title,
            source_file: source_file_name,
            message_count: retained,
            dropped_count: total - retained,
        });
        &self.threads[self.threads.len() - 1]
    }

    /// Drop all messages, threads and participants.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.positions.clear();
        self.threads.clear();
        self.participants.clear();
        self.next_seq = 0;
    }

    /// Stable sort by timestamp, then refresh the position index.
    fn resort(&mut self) {
        self.messages.sort_by_key(Message::sort_key);
        self.positions = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.seq, i))
            .collect();
    }
}
