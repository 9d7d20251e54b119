//! Task write workflows.

use chrono::NaiveDate;
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

use sprout_core::date::{deserialize_date, deserialize_optional_date};
use sprout_core::patch::deserialize_nullable;
use sprout_core::recurrence::Recurrence;
use sprout_db::db::connection::DbConnection;
use sprout_db::db::enums::{RecurrencePattern, TaskKind};
use sprout_db::model::task::{NewTask, Task};

use crate::error::{ServiceError, ServiceResult};
use crate::task::advance::{Advancement, advance};
use crate::task::store::{PgTaskStore, TaskStore};

/// Payload for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub plant_id: uuid::Uuid,
    pub kind: TaskKind,
    #[serde(deserialize_with = "deserialize_date")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub recurrence_interval: Option<i32>,
}

/// Partial update of a task. Absent fields are left unchanged; `notes: null`
/// clears the notes.
///
/// Setting `is_recurring` to `false` clears the recurrence fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub plant_id: Option<uuid::Uuid>,
    pub kind: Option<TaskKind>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub notes: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<i32>,
}

/// Result of completing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub completed: Task,
    pub successor: Option<Task>,
}

/// ## Summary
/// Recomputes the cached `next_recurrence` of a task after a write.
///
/// A recurring task keeps its cached value unless it has none or its due date
/// changed, in which case the value is reset to the due date. Non-recurring
/// tasks carry none.
#[must_use]
pub fn restore_next_recurrence(
    is_recurring: bool,
    due_date: NaiveDate,
    current: Option<NaiveDate>,
    due_date_changed: bool,
) -> Option<NaiveDate> {
    if !is_recurring {
        return None;
    }

    match current {
        Some(next) if !due_date_changed => Some(next),
        _ => Some(due_date),
    }
}

fn task_not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Task {id}"))
}

fn plant_not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Plant {id}"))
}

/// ## Summary
/// Creates a task for one of the owner's plants.
///
/// ## Errors
/// - `InvalidRecurrenceConfig` if the recurrence fields are inconsistent.
/// - `NotFound` if the plant does not belong to the owner.
#[tracing::instrument(skip(store, request))]
pub async fn create_task<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    request: CreateTask,
) -> ServiceResult<Task> {
    let recurrence = Recurrence::from_parts(
        request.is_recurring,
        request.recurrence_pattern.map(Into::into),
        request.recurrence_interval,
    )?;

    if !store.plant_exists(request.plant_id, owner_id).await? {
        return Err(plant_not_found(request.plant_id));
    }

    let is_recurring = recurrence.is_some();
    let new_task = NewTask {
        id: uuid::Uuid::now_v7(),
        owner_id,
        plant_id: request.plant_id,
        kind: request.kind,
        due_date: request.due_date,
        completed: false,
        completed_date: None,
        notes: request.notes,
        is_recurring,
        recurrence_pattern: request.recurrence_pattern,
        recurrence_interval: request.recurrence_interval,
        next_recurrence: restore_next_recurrence(is_recurring, request.due_date, None, true),
    };

    let task = store.insert(&new_task).await?;
    tracing::info!(task_id = %task.id, "Task created");
    Ok(task)
}

/// ## Summary
/// Applies a partial update to an owner's task.
///
/// ## Errors
/// - `NotFound` if the task, or a newly referenced plant, does not belong to
///   the owner.
/// - `InvalidRecurrenceConfig` if the resulting recurrence fields are
///   inconsistent.
#[tracing::instrument(skip(store, changes))]
pub async fn update_task<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    task_id: uuid::Uuid,
    changes: UpdateTask,
) -> ServiceResult<Task> {
    let existing = store
        .get(task_id, owner_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;
    let mut task = existing.clone();

    if let Some(plant_id) = changes.plant_id {
        if plant_id != existing.plant_id && !store.plant_exists(plant_id, owner_id).await? {
            return Err(plant_not_found(plant_id));
        }
        task.plant_id = plant_id;
    }
    if let Some(kind) = changes.kind {
        task.kind = kind;
    }
    if let Some(notes) = changes.notes {
        task.notes = notes;
    }
    if let Some(due_date) = changes.due_date {
        task.due_date = due_date;
    }
    if let Some(is_recurring) = changes.is_recurring {
        task.is_recurring = is_recurring;
        if !is_recurring {
            task.recurrence_pattern = None;
            task.recurrence_interval = None;
        }
    }
    if let Some(pattern) = changes.recurrence_pattern {
        task.recurrence_pattern = Some(pattern);
    }
    if let Some(interval) = changes.recurrence_interval {
        task.recurrence_interval = Some(interval);
    }

    Recurrence::from_parts(
        task.is_recurring,
        task.recurrence_pattern.map(Into::into),
        task.recurrence_interval,
    )?;

    task.next_recurrence = restore_next_recurrence(
        task.is_recurring,
        task.due_date,
        task.next_recurrence,
        task.due_date != existing.due_date,
    );

    store.update(&task).await
}

/// ## Summary
/// Completes an owner's task on `today`. A recurring task also gets its
/// successor inserted.
///
/// Callers must run this inside a transaction so a failed successor insert
/// does not leave a completed task without a successor; see
/// [`complete_task_in_transaction`].
///
/// ## Errors
/// - `NotFound` if the task does not belong to the owner.
/// - `Conflict` if it is already completed, including when another request
///   completes it first.
/// - `TransientPersistence` if the successor could not be inserted.
#[tracing::instrument(skip(store))]
pub async fn complete_task<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    task_id: uuid::Uuid,
    today: NaiveDate,
) -> ServiceResult<Completion> {
    let task = store
        .get(task_id, owner_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;

    let Advancement {
        completed,
        successor,
    } = advance(&task, today)?;

    let completed = store.mark_completed(&completed).await?.ok_or_else(|| {
        tracing::warn!(task_id = %task_id, "Task was completed by a concurrent request");
        ServiceError::Conflict(format!("task {task_id} is already completed"))
    })?;

    let successor = match successor {
        Some(new_task) => Some(store.insert(&new_task).await.map_err(|err| {
            tracing::error!(
                task_id = %task_id,
                error = %err,
                "Failed to create the next task of a recurring series"
            );
            ServiceError::TransientPersistence(format!(
                "could not create the next occurrence of task {task_id}: {err}"
            ))
        })?),
        None => None,
    };

    tracing::info!(
        task_id = %task_id,
        successor_id = ?successor.as_ref().map(|next| next.id),
        "Task completed"
    );

    Ok(Completion {
        completed,
        successor,
    })
}

/// ## Summary
/// Runs [`complete_task`] in a database transaction, rolling back the
/// completion if the successor cannot be created.
///
/// ## Errors
/// Returns the errors of [`complete_task`].
pub async fn complete_task_in_transaction(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    task_id: uuid::Uuid,
    today: NaiveDate,
) -> ServiceResult<Completion> {
    conn.transaction::<_, ServiceError, _>(move |tx| {
        async move {
            let mut store = PgTaskStore::new(tx);
            complete_task(&mut store, owner_id, task_id, today).await
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Deletes an owner's task. Synthetic instances have no stored row and so
/// cannot be deleted.
///
/// ## Errors
/// Returns `NotFound` if the task does not belong to the owner.
#[tracing::instrument(skip(store))]
pub async fn delete_task<S: TaskStore + ?Sized>(
    store: &mut S,
    owner_id: uuid::Uuid,
    task_id: uuid::Uuid,
) -> ServiceResult<()> {
    if store.delete(task_id, owner_id).await? {
        tracing::info!(task_id = %task_id, "Task deleted");
        Ok(())
    } else {
        Err(task_not_found(task_id))
    }
}
