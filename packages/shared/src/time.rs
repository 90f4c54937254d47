//! Time helpers. Everything is reported in JST (UTC+9).

use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap() // JST is UTC+9
}

fn now_jst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&jst())
}

/// Get current Unix timestamp (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    now_jst().timestamp_millis()
}

/// Convert a Unix timestamp in milliseconds to an RFC 3339 string in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&jst())
        .to_rfc3339()
}

/// Clock label stamped onto relayed messages, e.g. `13:05:09 2024-01-01`.
pub fn clock_label(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&jst())
        .format("%H:%M:%S %Y-%m-%d")
        .to_string()
}

/// Today's date in JST as `YYYY-MM-DD`.
pub fn today_label() -> String {
    now_jst().format("%Y-%m-%d").to_string()
}
