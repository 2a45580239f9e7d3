//! `ship_date` keys are days since 1970-01-01.

use time::{Date, OffsetDateTime, macros::format_description};

use crate::error::{FilterError, Result};

#[inline]
fn epoch_julian_day() -> i32 {
    OffsetDateTime::UNIX_EPOCH.date().to_julian_day()
}

/// Parses a strict `YYYY-MM-DD` calendar date into a day key.
pub fn parse_date(value: &str) -> Result<i32> {
    let date = Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| FilterError::InvalidDate(format!("{value}: {e}")))?;

    Ok(date.to_julian_day() - epoch_julian_day())
}

/// Formats a day key back to `YYYY-MM-DD`.
pub fn format_date(days: i32) -> Result<String> {
    let julian = days
        .checked_add(epoch_julian_day())
        .ok_or_else(|| FilterError::InvalidDate(format!("day {days} out of range")))?;

    let date = Date::from_julian_day(julian)
        .map_err(|e| FilterError::InvalidDate(format!("day {days}: {e}")))?;

    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| FilterError::InvalidDate(format!("day {days}: {e}")))
}
