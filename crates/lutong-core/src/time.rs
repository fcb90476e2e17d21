//! Timestamp helpers.
//!
//! All persisted timestamps are RFC 3339 strings in UTC with a fixed
//! microsecond width, so lexical order equals chronological order.

use chrono::{SecondsFormat, Utc};

/// Returns the current time as a fixed-width RFC 3339 UTC string.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
