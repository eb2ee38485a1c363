//! Timestamp column encoding.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that `ORDER BY`
//! on the text column follows chronological order.

use chrono::SecondsFormat;

use adpilot_domain::time::Timestamp;

use crate::error::decode_error;

pub(crate) fn encode(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(decode_error)
}
