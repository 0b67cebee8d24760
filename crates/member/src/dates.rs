//! Backend timestamp parsing
//!
//! Timestamps arrive as RFC 3339, as `YYYY-MM-DD HH:MM:SS` (with a space or
//! a `T`), or as a bare date. Offsets are dropped: the wall-clock time as
//! written is what the member sees.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::error::{MemberError, MemberResult};

/// Parse a backend timestamp. `None` when no known layout matches.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }

    let with_t = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let with_space = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let minutes_t = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let minutes_space = format_description!("[year]-[month]-[day] [hour]:[minute]");

    // Fractional seconds are not displayed anywhere
    let whole = raw.split('.').next().unwrap_or(raw);
    for layout in [with_t, with_space, minutes_t, minutes_space] {
        if let Ok(dt) = PrimitiveDateTime::parse(whole, layout) {
            return Some(dt);
        }
    }

    parse_date(raw).map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

/// Parse a `YYYY-MM-DD` day given on the command line
pub fn parse_day(raw: &str) -> MemberResult<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|source| {
        MemberError::InvalidDate {
            value: raw.to_string(),
            source,
        }
    })
}

/// `DD/MM/YYYY HH:mm`
pub fn format_display(dt: PrimitiveDateTime) -> String {
    dt.format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
        .unwrap_or_default()
}
