//! Timestamp utilities

use chrono::{DateTime, Local};

/// Format used for history timestamps (local time, microsecond precision)
pub const ISO_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Current local time as an ISO-8601 string without offset
pub fn now_iso_local() -> String {
    format_iso_local(&now())
}

/// Format a local timestamp as `YYYY-MM-DDTHH:MM:SS.ffffff`
pub fn format_iso_local(timestamp: &DateTime<Local>) -> String {
    timestamp.format(ISO_LOCAL_FORMAT).to_string()
}
