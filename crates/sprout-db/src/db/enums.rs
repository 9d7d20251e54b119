//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Kind of care a task represents.
///
/// Maps to `task.kind` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Watering,
    Fertilizing,
    Pruning,
    Other,
}

impl ToSql<Text, Pg> for TaskKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for TaskKind {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"watering" => Ok(Self::Watering),
            b"fertilizing" => Ok(Self::Fertilizing),
            b"pruning" => Ok(Self::Pruning),
            b"other" => Ok(Self::Other),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl TaskKind {
    /// Returns the database string representation of this task kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watering => "watering",
            Self::Fertilizing => "fertilizing",
            Self::Pruning => "pruning",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence pattern of a recurring task.
///
/// Maps to `task.recurrence_pattern` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ToSql<Text, Pg> for RecurrencePattern {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for RecurrencePattern {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"daily" => Ok(Self::Daily),
            b"weekly" => Ok(Self::Weekly),
            b"monthly" => Ok(Self::Monthly),
            b"yearly" => Ok(Self::Yearly),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl RecurrencePattern {
    /// Returns the database string representation of this pattern.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl From<RecurrencePattern> for sprout_core::types::RecurrencePattern {
    fn from(db_pattern: RecurrencePattern) -> Self {
        match db_pattern {
            RecurrencePattern::Daily => Self::Daily,
            RecurrencePattern::Weekly => Self::Weekly,
            RecurrencePattern::Monthly => Self::Monthly,
            RecurrencePattern::Yearly => Self::Yearly,
        }
    }
}

impl From<sprout_core::types::RecurrencePattern> for RecurrencePattern {
    fn from(core_pattern: sprout_core::types::RecurrencePattern) -> Self {
        match core_pattern {
            sprout_core::types::RecurrencePattern::Daily => Self::Daily,
            sprout_core::types::RecurrencePattern::Weekly => Self::Weekly,
            sprout_core::types::RecurrencePattern::Monthly => Self::Monthly,
            sprout_core::types::RecurrencePattern::Yearly => Self::Yearly,
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
