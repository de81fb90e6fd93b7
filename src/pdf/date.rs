//! Timestamp formats used in the output document.
//!
//! PDF dictionaries and XMP packets use different, non-interchangeable date
//! syntaxes. Both are rendered from the same instant.

use chrono::{DateTime, Offset, TimeZone};

/// PDF date string, e.g. `D:20240615103000+00'00'`.
pub fn pdf_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    let offset = dt.offset().fix().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.abs() / 60;
    format!(
        "D:{}{}{:02}'{:02}'",
        dt.naive_local().format("%Y%m%d%H%M%S"),
        sign,
        minutes / 60,
        minutes % 60,
    )
}

/// XMP (ISO 8601) date, e.g. `2024-06-15T10:30:00+00:00`.
pub fn xmp_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    let fixed = dt.with_timezone(&dt.offset().fix());
    fixed.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
