//! Time helpers shared across the workspace.
//!
//! All timestamps in Benegate are UTC [`OffsetDateTime`] values serialized as
//! RFC 3339. Data-access windows are measured in calendar months, so this
//! module also provides [`add_months`] with end-of-month day clamping.

use crate::error::{CoreError, Result};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};

/// Current UTC time.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Parse an RFC 3339 datetime string.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDateTime`] if the string is not valid RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        CoreError::invalid_date_time(format!("Failed to parse datetime '{value}': {e}"))
    })
}

/// Format a datetime as RFC 3339.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDateTime`] if the value cannot be represented
/// (e.g. a year outside the RFC 3339 range).
pub fn format_rfc3339(datetime: OffsetDateTime) -> Result<String> {
    datetime
        .format(&Rfc3339)
        .map_err(|e| CoreError::invalid_date_time(format!("Failed to format datetime: {e}")))
}

/// Shift a datetime by whole calendar months, clamping the day to the end of
/// the target month (Jan 31 + 1 month is the last day of February).
///
/// The time of day and UTC offset are preserved.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDateTime`] if the resulting year falls outside
/// the supported range.
pub fn add_months(datetime: OffsetDateTime, months: i32) -> Result<OffsetDateTime> {
    let zero_based = i32::from(u8::from(datetime.month())) - 1 + months;
    let year = datetime.year() + zero_based.div_euclid(12);
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8)
        .map_err(|e| CoreError::invalid_date_time(format!("Month arithmetic failed: {e}")))?;
    let day = datetime.day().min(month.length(year));
    let date = Date::from_calendar_date(year, month, day).map_err(|e| {
        CoreError::invalid_date_time(format!("Date {year}-{month:?}-{day} out of range: {e}"))
    })?;
    Ok(datetime.replace_date(date))
}
