//! Persistence seam for the task workflows.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use sprout_db::db::connection::DbConnection;
use sprout_db::db::query::{plant, task};
use sprout_db::db::query::task::TaskFilter;
use sprout_db::model::task::{NewTask, Task};

use crate::error::ServiceResult;

/// Storage for an owner's tasks.
///
/// Listings come back ordered by due date, then insertion order.
#[async_trait]
pub trait TaskStore: Send {
    async fn list(&mut self, filter: &TaskFilter) -> ServiceResult<Vec<Task>>;

    /// Open recurring tasks due on or before `until`.
    async fn list_open_recurring(
        &mut self,
        owner_id: uuid::Uuid,
        until: NaiveDate,
    ) -> ServiceResult<Vec<Task>>;

    async fn get(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<Option<Task>>;

    async fn plant_exists(
        &mut self,
        plant_id: uuid::Uuid,
        owner_id: uuid::Uuid,
    ) -> ServiceResult<bool>;

    async fn insert(&mut self, new_task: &NewTask) -> ServiceResult<Task>;

    /// Overwrites the stored task with the same id and owner.
    async fn update(&mut self, task: &Task) -> ServiceResult<Task>;

    /// Writes the completion fields of `completed`, but only while the stored
    /// task is still open. Returns `None` if it is not.
    async fn mark_completed(&mut self, completed: &Task) -> ServiceResult<Option<Task>>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<bool>;
}

/// [`TaskStore`] over a pooled Postgres connection.
pub struct PgTaskStore<'a, 'pool> {
    conn: &'a mut DbConnection<'pool>,
}

impl<'a, 'pool> PgTaskStore<'a, 'pool> {
    pub const fn new(conn: &'a mut DbConnection<'pool>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'a, 'pool> TaskStore for PgTaskStore<'a, 'pool> {
    async fn list(&mut self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        Ok(task::list_tasks(self.conn, filter).await?)
    }

    async fn list_open_recurring(
        &mut self,
        owner_id: uuid::Uuid,
        until: NaiveDate,
    ) -> ServiceResult<Vec<Task>> {
        Ok(task::list_open_recurring(self.conn, owner_id, until).await?)
    }

    async fn get(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<Option<Task>> {
        Ok(task::get_task(self.conn, id, owner_id).await?)
    }

    async fn plant_exists(
        &mut self,
        plant_id: uuid::Uuid,
        owner_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        Ok(plant::plant_exists(self.conn, plant_id, owner_id).await?)
    }

    async fn insert(&mut self, new_task: &NewTask) -> ServiceResult<Task> {
        Ok(task::create_task(self.conn, new_task).await?)
    }

    async fn update(&mut self, updated: &Task) -> ServiceResult<Task> {
        Ok(task::update_task(self.conn, updated, Utc::now()).await?)
    }

    async fn mark_completed(&mut self, completed: &Task) -> ServiceResult<Option<Task>> {
        Ok(task::mark_completed(self.conn, completed, Utc::now()).await?)
    }

    async fn delete(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<bool> {
        Ok(task::delete_task(self.conn, id, owner_id).await? > 0)
    }
}
