//! Read workflows: the windowed task listing and the upcoming-task view.
//!
//! Both merge persisted tasks with synthetic instances expanded from the
//! owner's open recurring tasks and order the result by due date. The sort is
//! stable, so entries sharing a due date keep persisted-then-synthetic order
//! and, within each, the store's insertion order.

use chrono::{Datelike, Days, Months, NaiveDate};

use sprout_core::constants::{UPCOMING_LIMIT, UPCOMING_WINDOW_DAYS};
use sprout_db::db::query::task::TaskFilter;
use sprout_db::model::task::Task;

use crate::error::{ServiceError, ServiceResult};
use crate::task::entry::{SyntheticInstance, TaskEntry};
use crate::task::expand::expand_between;
use crate::task::store::TaskStore;

/// Inclusive range of due dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// ## Errors
    /// Returns `ValidationError` if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ServiceResult<Self> {
        if from > to {
            return Err(ServiceError::ValidationError(format!(
                "start date {from} is after end date {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The calendar month containing `date`.
    #[must_use]
    pub fn month_of(date: NaiveDate) -> Self {
        let from = date.with_day(1).unwrap_or(date);
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next_month| next_month.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { from, to }
    }

    /// `today` through `today + UPCOMING_WINDOW_DAYS`.
    #[must_use]
    pub fn upcoming_from(today: NaiveDate) -> Self {
        let to = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self { from: today, to }
    }

    #[must_use]
    pub const fn from(self) -> NaiveDate {
        self.from
    }

    #[must_use]
    pub const fn to(self) -> NaiveDate {
        self.to
    }
}

/// Parameters of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    /// Defaults to the current calendar month.
    pub window: Option<DateWindow>,
    pub completed: Option<bool>,
    /// Whether to add synthetic instances of recurring tasks.
    pub include_synthetic: bool,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            window: None,
            completed: None,
            include_synthetic: true,
        }
    }
}

/// ## Summary
/// Lists an owner's tasks due inside the query window, merged with the
/// synthetic instances of their open recurring tasks.
///
/// Synthetic instances are never completed, so none are added when the query
/// asks for completed tasks only.
///
/// ## Errors
/// Returns storage errors, or `InvalidRecurrenceConfig` for a corrupt
/// recurring task.
#[tracing::instrument(skip(store, query))]
pub async fn list_tasks<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    query: &TaskQuery,
    today: NaiveDate,
) -> ServiceResult<Vec<TaskEntry>> {
    let window = query.window.unwrap_or_else(|| DateWindow::month_of(today));

    let persisted = store
        .list(&TaskFilter {
            owner_id,
            due_from: Some(window.from),
            due_to: Some(window.to),
            completed: query.completed,
        })
        .await?;

    let synthetic = if query.include_synthetic && query.completed != Some(true) {
        synthesize(store, owner_id, window).await?
    } else {
        Vec::new()
    };

    tracing::debug!(
        from = %window.from,
        to = %window.to,
        persisted = persisted.len(),
        synthetic = synthetic.len(),
        "Listed tasks"
    );

    Ok(merge(persisted, synthetic))
}

/// ## Summary
/// Returns at most `UPCOMING_LIMIT` open tasks due in the next
/// `UPCOMING_WINDOW_DAYS` days, synthetic instances included.
///
/// ## Errors
/// Returns storage errors, or `InvalidRecurrenceConfig` for a corrupt
/// recurring task.
#[tracing::instrument(skip(store))]
pub async fn upcoming_tasks<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    today: NaiveDate,
) -> ServiceResult<Vec<TaskEntry>> {
    let window = DateWindow::upcoming_from(today);

    let persisted = store
        .list(&TaskFilter {
            owner_id,
            due_from: Some(window.from),
            due_to: Some(window.to),
            completed: Some(false),
        })
        .await?;
    let synthetic = synthesize(store, owner_id, window).await?;

    let mut entries = merge(persisted, synthetic);
    entries.truncate(UPCOMING_LIMIT);
    Ok(entries)
}

async fn synthesize<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    window: DateWindow,
) -> ServiceResult<Vec<SyntheticInstance>> {
    let templates = store.list_open_recurring(owner_id, window.to).await?;

    let mut instances = Vec::new();
    for template in &templates {
        instances.extend(expand_between(template, window.from, window.to)?);
    }

    Ok(instances)
}

fn merge(persisted: Vec<Task>, synthetic: Vec<SyntheticInstance>) -> Vec<TaskEntry> {
    let mut entries: Vec<TaskEntry> = persisted
        .into_iter()
        .map(TaskEntry::Persisted)
        .chain(synthetic.into_iter().map(TaskEntry::Synthetic))
        .collect();
    entries.sort_by_key(TaskEntry::due_date);
    entries
}
