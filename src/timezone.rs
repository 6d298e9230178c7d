//! Wall clock helpers for the configured time zone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::{Error, month::YearMonth};

/// The current UTC offset of the IANA time zone `canonical_timezone`, e.g.
/// "Pacific/Auckland".
///
/// Returns `None` if the time zone is unknown.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current time in `canonical_timezone`.
///
/// # Errors
///
/// Returns [Error::InvalidTimezoneError] if the time zone is unknown.
pub fn now_in(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    let offset = get_local_offset(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    Ok(OffsetDateTime::now_utc().to_offset(offset))
}

/// Today's date in `canonical_timezone`.
pub fn today(canonical_timezone: &str) -> Result<Date, Error> {
    now_in(canonical_timezone).map(|now| now.date())
}

/// The calendar month it currently is in `canonical_timezone`.
pub fn current_month(canonical_timezone: &str) -> Result<YearMonth, Error> {
    now_in(canonical_timezone).map(YearMonth::containing)
}
