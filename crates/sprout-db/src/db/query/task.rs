//! Query functions for tasks.
//!
//! Every listing is ordered by `(due_date, created_at, id)`, so records that
//! share a due date keep their insertion order.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::task;
use crate::model::task::{NewTask, Task, TaskChangeset};

/// Filter for listing an owner's persisted tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilter {
    pub owner_id: uuid::Uuid,
    /// Inclusive lower bound on `due_date`.
    pub due_from: Option<NaiveDate>,
    /// Inclusive upper bound on `due_date`.
    pub due_to: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl TaskFilter {
    /// Returns `true` if `task` satisfies this filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.owner_id == self.owner_id
            && self.due_from.is_none_or(|from| task.due_date >= from)
            && self.due_to.is_none_or(|to| task.due_date <= to)
            && self.completed.is_none_or(|completed| task.completed == completed)
    }
}

/// ## Summary
/// Returns a query to select an owner's tasks in due-date order.
#[must_use]
pub fn by_owner(owner_id: uuid::Uuid) -> task::BoxedQuery<'static, diesel::pg::Pg> {
    task::table
        .filter(task::owner_id.eq(owner_id))
        .order((task::due_date.asc(), task::created_at.asc(), task::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query matching a [`TaskFilter`].
#[must_use]
pub fn by_filter(filter: &TaskFilter) -> task::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = by_owner(filter.owner_id);

    if let Some(from) = filter.due_from {
        query = query.filter(task::due_date.ge(from));
    }
    if let Some(to) = filter.due_to {
        query = query.filter(task::due_date.le(to));
    }
    if let Some(completed) = filter.completed {
        query = query.filter(task::completed.eq(completed));
    }

    query
}

/// ## Summary
/// Returns a query for an owner's open recurring tasks due on or before `until`.
#[must_use]
pub fn open_recurring_due_by(
    owner_id: uuid::Uuid,
    until: NaiveDate,
) -> task::BoxedQuery<'static, diesel::pg::Pg> {
    by_owner(owner_id)
        .filter(task::is_recurring.eq(true))
        .filter(task::completed.eq(false))
        .filter(task::due_date.le(until))
}

/// ## Summary
/// Inserts a new task and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_task(
    conn: &mut DbConnection<'_>,
    new_task: &NewTask,
) -> diesel::QueryResult<Task> {
    diesel::insert_into(task::table)
        .values(new_task)
        .returning(Task::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves a task by ID, scoped to its owner.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_task(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<Option<Task>> {
    by_owner(owner_id)
        .filter(task::id.eq(id))
        .select(Task::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists tasks matching a filter.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_tasks(
    conn: &mut DbConnection<'_>,
    filter: &TaskFilter,
) -> diesel::QueryResult<Vec<Task>> {
    by_filter(filter)
        .select(Task::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists an owner's open recurring tasks due on or before `until`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_open_recurring(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    until: NaiveDate,
) -> diesel::QueryResult<Vec<Task>> {
    open_recurring_due_by(owner_id, until)
        .select(Task::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Overwrites the mutable columns of a task and returns the stored record.
///
/// ## Errors
/// Returns a database error if the update fails, or `NotFound` if the task
/// no longer exists.
pub async fn update_task(
    conn: &mut DbConnection<'_>,
    updated: &Task,
    now: DateTime<Utc>,
) -> diesel::QueryResult<Task> {
    let changes = TaskChangeset::from_task(updated, now);

    diesel::update(
        task::table
            .filter(task::id.eq(updated.id))
            .filter(task::owner_id.eq(updated.owner_id)),
    )
    .set(&changes)
    .returning(Task::as_returning())
    .get_result(conn)
    .await
}

/// ## Summary
/// Marks an open task completed, writing the completion columns of `completed`.
///
/// The update only matches while the stored row is still open, so of two
/// concurrent completions exactly one wins. Returns `Ok(None)` if the task is
/// missing, foreign or already completed.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn mark_completed(
    conn: &mut DbConnection<'_>,
    completed: &Task,
    now: DateTime<Utc>,
) -> diesel::QueryResult<Option<Task>> {
    diesel::update(
        task::table
            .filter(task::id.eq(completed.id))
            .filter(task::owner_id.eq(completed.owner_id))
            .filter(task::completed.eq(false)),
    )
    .set((
        task::completed.eq(true),
        task::completed_date.eq(completed.completed_date),
        task::next_recurrence.eq(completed.next_recurrence),
        task::updated_at.eq(now),
    ))
    .returning(Task::as_returning())
    .get_result(conn)
    .await
    .optional()
}

/// ## Summary
/// Deletes an owner's task. Returns the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_task(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<usize> {
    diesel::delete(
        task::table
            .filter(task::id.eq(id))
            .filter(task::owner_id.eq(owner_id)),
    )
    .execute(conn)
    .await
}
