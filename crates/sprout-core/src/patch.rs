//! Deserializers for partial-update payloads.
//!
//! A PATCH body distinguishes a missing field (leave unchanged) from an
//! explicit `null` (clear it). Fields use `Option<Option<T>>` with
//! `#[serde(default, deserialize_with = "...")]`: missing is `None`, `null`
//! is `Some(None)`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::date::parse_calendar_date;

/// ## Summary
/// `deserialize_with` adapter for a nullable field of a partial update.
///
/// ## Errors
/// Returns a deserialization error if a non-null value does not parse as `T`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// ## Summary
/// `deserialize_with` adapter for a nullable calendar date of a partial update.
///
/// ## Errors
/// Returns a deserialization error if a non-null value is not a date.
pub fn deserialize_nullable_date<'de, D>(
    deserializer: D,
) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_calendar_date(&raw).map_err(serde::de::Error::custom))
        .transpose()
        .map(Some)
}
