//! Recurrence rules for tasks.
//!
//! A [`Recurrence`] pairs a [`RecurrencePattern`] with a positive interval and
//! owns the calendar stepping used both when expanding a recurring task into
//! future instances and when completing it.
//!
//! ## Stepping
//! - daily: `+interval` days
//! - weekly: `+interval × 7` days
//! - monthly: `+interval` calendar months, clamping the day-of-month to the
//!   last day of a shorter month (Jan 31 → Feb 28/29)
//! - yearly: `+interval` calendar years, with the same clamping (Feb 29 → Feb 28)
//!
//! Steps are cumulative: each occurrence is computed from the previous one,
//! never re-derived from the first due date.

use std::iter::FusedIterator;
use std::num::NonZeroU32;

use chrono::{Days, Months, NaiveDate};

use crate::error::{CoreError, CoreResult};
use crate::types::RecurrencePattern;

const DAYS_PER_WEEK: u64 = 7;
const MONTHS_PER_YEAR: u32 = 12;

/// A validated recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recurrence {
    pattern: RecurrencePattern,
    interval: NonZeroU32,
}

impl Recurrence {
    /// ## Summary
    /// Builds a rule from a pattern and a raw interval as stored or received.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrenceConfig` if `interval` is less than 1.
    pub fn new(pattern: RecurrencePattern, interval: i32) -> CoreResult<Self> {
        let interval = u32::try_from(interval)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                CoreError::InvalidRecurrenceConfig(format!(
                    "recurrence interval must be at least 1, got {interval}"
                ))
            })?;

        Ok(Self { pattern, interval })
    }

    /// ## Summary
    /// Validates the recurrence fields of a task as a whole.
    ///
    /// Pattern and interval must be present if and only if the task is recurring.
    /// Returns `Ok(None)` for a valid non-recurring task.
    ///
    /// ## Errors
    /// Returns `InvalidRecurrenceConfig` if the fields are inconsistent or the
    /// interval is less than 1.
    pub fn from_parts(
        is_recurring: bool,
        pattern: Option<RecurrencePattern>,
        interval: Option<i32>,
    ) -> CoreResult<Option<Self>> {
        match (is_recurring, pattern, interval) {
            (true, Some(pattern), Some(interval)) => Self::new(pattern, interval).map(Some),
            (true, None, _) => Err(CoreError::InvalidRecurrenceConfig(
                "recurring tasks require a recurrence pattern".to_string(),
            )),
            (true, Some(_), None) => Err(CoreError::InvalidRecurrenceConfig(
                "recurring tasks require a recurrence interval".to_string(),
            )),
            (false, None, None) => Ok(None),
            (false, _, _) => Err(CoreError::InvalidRecurrenceConfig(
                "recurrence pattern and interval are only allowed on recurring tasks".to_string(),
            )),
        }
    }

    #[must_use]
    pub const fn pattern(self) -> RecurrencePattern {
        self.pattern
    }

    #[must_use]
    pub const fn interval(self) -> NonZeroU32 {
        self.interval
    }

    /// ## Summary
    /// Advances `from` by exactly one recurrence step.
    ///
    /// ## Errors
    /// Returns `DateOutOfRange` if the result does not fit in the calendar.
    pub fn step(self, from: NaiveDate) -> CoreResult<NaiveDate> {
        let interval = self.interval.get();

        let next = match self.pattern {
            RecurrencePattern::Daily => from.checked_add_days(Days::new(u64::from(interval))),
            RecurrencePattern::Weekly => {
                from.checked_add_days(Days::new(u64::from(interval) * DAYS_PER_WEEK))
            }
            RecurrencePattern::Monthly => from.checked_add_months(Months::new(interval)),
            RecurrencePattern::Yearly => interval
                .checked_mul(MONTHS_PER_YEAR)
                .and_then(|months| from.checked_add_months(Months::new(months))),
        };

        next.ok_or(CoreError::DateOutOfRange(from))
    }

    /// ## Summary
    /// Returns the occurrences strictly after `anchor`, in order.
    ///
    /// The anchor itself is never yielded. The iterator ends if stepping would
    /// leave the representable calendar.
    #[must_use]
    pub const fn occurrences_after(self, anchor: NaiveDate) -> Occurrences {
        Occurrences {
            rule: self,
            cursor: Some(anchor),
        }
    }

    /// ## Summary
    /// Returns the occurrences strictly after `anchor` and on or before `until`.
    pub fn occurrences_until(
        self,
        anchor: NaiveDate,
        until: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> {
        self.occurrences_after(anchor)
            .take_while(move |date| *date <= until)
    }

    /// ## Summary
    /// Returns the occurrences strictly after `anchor` that fall within
    /// `from..=until`.
    ///
    /// Daily and weekly rules jump straight to the window, since their
    /// occurrences are exact multiples of the step. Monthly and yearly rules
    /// walk from the anchor, as clamping makes each step depend on the last.
    pub fn occurrences_between(
        self,
        anchor: NaiveDate,
        from: NaiveDate,
        until: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> {
        self.occurrences_after(self.last_before(anchor, from))
            .skip_while(move |date| *date < from)
            .take_while(move |date| *date <= until)
    }

    /// The anchor, or the latest fixed-length occurrence before `from`.
    fn last_before(self, anchor: NaiveDate, from: NaiveDate) -> NaiveDate {
        let interval = u64::from(self.interval.get());
        let step_days = match self.pattern {
            RecurrencePattern::Daily => interval,
            RecurrencePattern::Weekly => interval * DAYS_PER_WEEK,
            RecurrencePattern::Monthly | RecurrencePattern::Yearly => return anchor,
        };

        let Ok(gap) = u64::try_from(from.signed_duration_since(anchor).num_days()) else {
            return anchor;
        };
        if gap == 0 {
            return anchor;
        }

        let skipped = (gap - 1) / step_days;
        anchor
            .checked_add_days(Days::new(skipped * step_days))
            .unwrap_or(anchor)
    }
}

/// Iterator over the occurrences of a [`Recurrence`] after an anchor date.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: Recurrence,
    cursor: Option<NaiveDate>,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.rule.step(current).ok();
        self.cursor
    }
}

impl FusedIterator for Occurrences {}
