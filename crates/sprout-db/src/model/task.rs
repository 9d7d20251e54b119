use chrono::{DateTime, NaiveDate, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::enums::{RecurrencePattern, TaskKind};
use crate::db::schema;
use crate::model::plant::Plant;

/// A persisted task. A recurring task is the template from which future
/// occurrences are derived on read.
#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::task)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(Plant, foreign_key = plant_id))]
pub struct Task {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub plant_id: uuid::Uuid,
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<i32>,
    pub next_recurrence: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::task)]
pub struct NewTask {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub plant_id: uuid::Uuid,
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<i32>,
    pub next_recurrence: Option<NaiveDate>,
}

/// Full overwrite of a task's mutable columns. `None` writes `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = schema::task)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset<'a> {
    pub plant_id: uuid::Uuid,
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<i32>,
    pub next_recurrence: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> TaskChangeset<'a> {
    #[must_use]
    pub fn from_task(task: &'a Task, updated_at: DateTime<Utc>) -> Self {
        Self {
            plant_id: task.plant_id,
            kind: task.kind,
            due_date: task.due_date,
            completed: task.completed,
            completed_date: task.completed_date,
            notes: task.notes.as_deref(),
            is_recurring: task.is_recurring,
            recurrence_pattern: task.recurrence_pattern,
            recurrence_interval: task.recurrence_interval,
            next_recurrence: task.next_recurrence,
            updated_at,
        }
    }
}
