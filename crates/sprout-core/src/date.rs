//! Calendar-date parsing for request payloads and query strings.
//!
//! Dates are naive calendar dates. Clients may send either `YYYY-MM-DD` or a
//! full RFC 3339 timestamp, in which case the UTC date part is used.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Parses a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// ## Errors
/// Returns `ValidationError` if the input is neither.
pub fn parse_calendar_date(raw: &str) -> CoreResult<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.naive_utc().date())
        .map_err(|_err| {
            CoreError::ValidationError(format!("invalid date '{raw}', expected YYYY-MM-DD"))
        })
}

/// ## Summary
/// `deserialize_with` adapter for a required calendar date.
///
/// ## Errors
/// Returns a deserialization error if the value is not a string or not a date.
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

/// ## Summary
/// `deserialize_with` adapter for an optional calendar date. Pair it with
/// `#[serde(default)]` so a missing field becomes `None`.
///
/// ## Errors
/// Returns a deserialization error if a present value is not a date.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_calendar_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
