//! Task endpoints. Listings mix stored tasks with synthetic instances of
//! recurring tasks; every task is returned with a summary of its plant.

use chrono::Utc;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use sprout_core::date::parse_calendar_date;
use sprout_db::db::connection::DbConnection;
use sprout_db::model::plant::PlantSummary;
use sprout_db::model::task::Task;
use sprout_service::plant::service::plant_summaries;
use sprout_service::task::query::{DateWindow, TaskQuery, list_tasks, upcoming_tasks};
use sprout_service::task::service::{
    CreateTask, UpdateTask, complete_task_in_transaction, create_task, delete_task, update_task,
};
use sprout_service::task::{PgTaskStore, TaskEntry, TaskView};

use super::{TASKS_ROUTE_COMPONENT, current_user_id, json_body, path_id};
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

const TASK: &str = "Task";

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: TaskView,
    pub plant: Option<PlantSummary>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub completed: TaskResponse,
    pub successor: Option<TaskResponse>,
}

fn parse_flag(name: &str, raw: Option<&str>) -> AppResult<Option<bool>> {
    match raw {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(AppError::BadRequest(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

/// ## Summary
/// Builds a [`TaskQuery`] from the listing's query-string parameters.
///
/// An explicit window needs both dates; otherwise the current month is used.
/// Synthetic instances are only included with `include_recurring=true`.
///
/// ## Errors
/// Returns 400-class errors for unparsable values or an inverted window.
fn task_query(
    start_date: Option<&str>,
    end_date: Option<&str>,
    completed: Option<&str>,
    include_recurring: Option<&str>,
) -> AppResult<TaskQuery> {
    let window = match (start_date, end_date) {
        (Some(start), Some(end)) => Some(DateWindow::new(
            parse_calendar_date(start)?,
            parse_calendar_date(end)?,
        )?),
        _ => None,
    };

    Ok(TaskQuery {
        window,
        completed: parse_flag("completed", completed)?,
        include_synthetic: parse_flag("include_recurring", include_recurring)?.unwrap_or(false),
    })
}

async fn with_plants(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    entries: &[TaskEntry],
) -> AppResult<Vec<TaskResponse>> {
    let mut plant_ids: Vec<uuid::Uuid> = entries.iter().map(TaskEntry::plant_id).collect();
    plant_ids.sort_unstable();
    plant_ids.dedup();

    let plants = plant_summaries(conn, owner_id, &plant_ids).await?;

    Ok(entries
        .iter()
        .map(|entry| TaskResponse {
            task: TaskView::from(entry),
            plant: plants.get(&entry.plant_id()).cloned(),
        })
        .collect())
}

async fn with_plant(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    task: Task,
) -> AppResult<TaskResponse> {
    with_plants(conn, owner_id, &[TaskEntry::Persisted(task)])
        .await?
        .pop()
        .ok_or(AppError::CoreError(
            sprout_core::error::CoreError::InvariantViolation("task response went missing"),
        ))
}

/// ## Summary
/// GET /api/tasks - Lists tasks in a date window.
///
/// Query parameters: `start_date`, `end_date`, `completed`, `include_recurring`.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<TaskResponse>>> {
    let owner_id = current_user_id(depot)?;
    let start_date = req.query::<String>("start_date");
    let end_date = req.query::<String>("end_date");
    let completed = req.query::<String>("completed");
    let include_recurring = req.query::<String>("include_recurring");
    let query = task_query(
        start_date.as_deref(),
        end_date.as_deref(),
        completed.as_deref(),
        include_recurring.as_deref(),
    )?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let entries = list_tasks(
        &mut PgTaskStore::new(&mut conn),
        owner_id,
        &query,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(with_plants(&mut conn, owner_id, &entries).await?))
}

/// GET /api/tasks/upcoming - The next open tasks, synthetic instances included.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn upcoming(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<TaskResponse>>> {
    let owner_id = current_user_id(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let entries = upcoming_tasks(
        &mut PgTaskStore::new(&mut conn),
        owner_id,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(with_plants(&mut conn, owner_id, &entries).await?))
}

/// ## Summary
/// POST /api/tasks - Creates a task for one of the caller's plants.
///
/// ## Errors
/// Returns 400 for an invalid recurrence, 404 for an unknown plant.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn create(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<TaskResponse>> {
    let owner_id = current_user_id(depot)?;
    let request: CreateTask = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let task = create_task(&mut PgTaskStore::new(&mut conn), owner_id, request).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(with_plant(&mut conn, owner_id, task).await?))
}

/// PATCH /api/tasks/{id} - Partially updates a stored task.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<TaskResponse>> {
    let owner_id = current_user_id(depot)?;
    let task_id = path_id(req, TASK)?;
    let changes: UpdateTask = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let task = update_task(&mut PgTaskStore::new(&mut conn), owner_id, task_id, changes).await?;

    Ok(Json(with_plant(&mut conn, owner_id, task).await?))
}

/// ## Summary
/// PATCH /api/tasks/{id}/complete - Completes a task; a recurring task spawns
/// its successor.
///
/// ## Errors
/// Returns 404 for unknown or synthetic ids, 409 if already completed.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn complete(req: &mut Request, depot: &mut Depot) -> AppResult<Json<CompletionResponse>> {
    let owner_id = current_user_id(depot)?;
    let task_id = path_id(req, TASK)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let completion =
        complete_task_in_transaction(&mut conn, owner_id, task_id, Utc::now().date_naive())
            .await?;

    let completed = with_plant(&mut conn, owner_id, completion.completed).await?;
    let successor = match completion.successor {
        Some(task) => Some(with_plant(&mut conn, owner_id, task).await?),
        None => None,
    };

    Ok(Json(CompletionResponse {
        completed,
        successor,
    }))
}

/// DELETE /api/tasks/{id} - Deletes a stored task.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn delete(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let owner_id = current_user_id(depot)?;
    let task_id = path_id(req, TASK)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    delete_task(&mut PgTaskStore::new(&mut conn), owner_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(TASKS_ROUTE_COMPONENT)
        .get(list)
        .post(create)
        .push(Router::with_path("upcoming").get(upcoming))
        .push(
            Router::with_path("{id}")
                .patch(update)
                .delete(delete)
                .push(Router::with_path("complete").patch(complete)),
        )
}
