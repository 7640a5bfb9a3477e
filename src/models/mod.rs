//! Data models for the office-management dashboard.
//!
//! These records mirror the backend JSON exactly (`camelCase` on the wire) so
//! responses deserialize without any hand-written mapping.

mod complaint;
mod employee;
mod feedback;
mod language;
mod notification;
mod organization;
mod rating;
mod statistics;
mod user;

pub use complaint::*;
pub use employee::*;
pub use feedback::*;
pub use language::*;
pub use notification::*;
pub use organization::*;
pub use rating::*;
pub use statistics::*;
pub use user::*;

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a backend timestamp: RFC 3339, or a bare `YYYY-MM-DD` taken as
/// midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
