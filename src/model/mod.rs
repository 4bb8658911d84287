//! Data model for exported chat-thread archives.
//!
//! Two layers live here:
//! - the raw serde shapes of a thread document ([`RawThread`], [`RawMessage`]),
//!   which accept loosely typed input and keep unknown fields;
//! - the ingested, immutable [`Message`] that makes up the merged timeline.

pub mod message;
pub mod thread;

pub use message::*;
pub use thread::*;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Unknown JSON fields kept verbatim and passed through to JSON output.
pub type UnknownFields = IndexMap<String, Value>;

/// Participant names, in the order they were first seen.
pub type ParticipantSet = IndexSet<String>;

/// Accept any JSON value, keeping it only if it is a string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accept any JSON value as epoch milliseconds.
///
/// Integers are taken as-is, finite floats are truncated, anything else is
/// treated as absent.
pub(crate) fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    })
}
