//! Time related utils.

use chrono::Utc;

use crate::{Error, Result};

/// DateTime is an alias of `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Timestamp layout carried in the `SignedDate` header, for example
/// `2022-03-13T07:20:04.123+0000`.
const SIGNED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Create a datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into the signed date layout.
///
/// The offset is always rendered as `+0000` since [`DateTime`] is pinned
/// to UTC.
pub fn format_signed_date(t: DateTime) -> String {
    t.format(SIGNED_DATE_FORMAT).to_string()
}

/// Parse a signed date string back into a datetime.
pub fn parse_signed_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_str(s, SIGNED_DATE_FORMAT)
        .map_err(|e| Error::unexpected(format!("invalid signed date: {s}")).with_source(e))?;

    Ok(t.with_timezone(&Utc))
}
