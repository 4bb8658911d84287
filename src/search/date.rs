//! Date matching for search queries.

use chrono::{DateTime, Days, Local, NaiveDate, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Message;

/// Exact `YYYY-MM-DD` query.
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("ISO date pattern is valid"));

/// Source of the current calendar date for `today` / `yesterday`.
pub trait Clock: Send + Sync {
    /// Current date in the local time zone.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Whether a lowercased `term` matches the message's timestamp.
///
/// - no timestamp: never matches;
/// - `today` / `yesterday`: local calendar date equals `today` / the day before;
/// - `YYYY-MM-DD`: UTC calendar date equals that date (invalid dates never match);
/// - anything else: substring of the UTC `YYYY-MM-DD` date.
#[must_use]
pub fn matches_date_search(term: &str, message: &Message, today: NaiveDate) -> bool {
    let Some(timestamp) = message.timestamp() else {
        return false;
    };

    match term {
        "today" => return message_local_date(message) == Some(today),
        "yesterday" => {
            return today
                .checked_sub_days(Days::new(1))
                .is_some_and(|day| message_local_date(message) == Some(day));
        }
        _ => {}
    }

    if ISO_DATE.is_match(term) {
        return NaiveDate::parse_from_str(term, "%Y-%m-%d")
            .is_ok_and(|date| timestamp.date_naive() == date);
    }

    timestamp.format("%Y-%m-%d").to_string().contains(term)
}

fn message_local_date(message: &Message) -> Option<NaiveDate> {
    message.timestamp().and_then(|ts| date_in_zone(ts, &Local))
}

/// Calendar date of `ts` in `tz`; `None` when the shifted time leaves chrono's range.
fn date_in_zone<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> Option<NaiveDate> {
    let utc = ts.naive_utc();
    let offset = tz.offset_from_utc_datetime(&utc).fix();
    utc.checked_add_offset(offset).map(|local| local.date())
}
