//! Fixtures and an in-memory [`TaskStore`] for workflow tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use sprout_db::db::enums::{RecurrencePattern, TaskKind};
use sprout_db::db::query::task::TaskFilter;
use sprout_db::model::task::{NewTask, Task};

use crate::error::{ServiceError, ServiceResult};
use crate::task::store::TaskStore;

pub const OWNER: uuid::Uuid = uuid::Uuid::from_u128(0x0193_0000_0000_7000_8000_0000_0000_0001);
pub const OTHER_OWNER: uuid::Uuid =
    uuid::Uuid::from_u128(0x0193_0000_0000_7000_8000_0000_0000_0002);
pub const PLANT: uuid::Uuid = uuid::Uuid::from_u128(0x0193_0000_0000_7000_8000_0000_0000_00a1);

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn timestamp() -> DateTime<Utc> {
    date(2024, 1, 1)
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
        .and_utc()
}

/// An open, non-recurring watering task.
pub fn task(due_date: NaiveDate) -> Task {
    Task {
        id: uuid::Uuid::now_v7(),
        owner_id: OWNER,
        plant_id: PLANT,
        kind: TaskKind::Watering,
        due_date,
        completed: false,
        completed_date: None,
        notes: None,
        is_recurring: false,
        recurrence_pattern: None,
        recurrence_interval: None,
        next_recurrence: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

pub fn recurring_task(due_date: NaiveDate, pattern: RecurrencePattern, interval: i32) -> Task {
    Task {
        is_recurring: true,
        recurrence_pattern: Some(pattern),
        recurrence_interval: Some(interval),
        next_recurrence: Some(due_date),
        ..task(due_date)
    }
}

pub fn monthly_task(due_date: NaiveDate) -> Task {
    recurring_task(due_date, RecurrencePattern::Monthly, 1)
}

/// Keeps tasks in insertion order and answers queries the way the Postgres
/// store does.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    pub tasks: Vec<Task>,
    /// `(owner_id, plant_id)` pairs.
    pub plants: Vec<(uuid::Uuid, uuid::Uuid)>,
    pub fail_inserts: bool,
    /// Simulates another request completing the task between the read and
    /// the completing write.
    pub completed_elsewhere: bool,
    inserted: i64,
}

impl MemoryTaskStore {
    pub fn with_plant() -> Self {
        Self {
            plants: vec![(OWNER, PLANT)],
            ..Self::default()
        }
    }

    pub fn seed(&mut self, task: Task) -> Task {
        self.tasks.push(task.clone());
        task
    }

    pub fn stored(&self, id: uuid::Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn sorted(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().filter(|t| keep(t)).cloned().collect();
        tasks.sort_by_key(|task| (task.due_date, task.created_at, task.id));
        tasks
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&mut self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        Ok(self.sorted(|task| filter.matches(task)))
    }

    async fn list_open_recurring(
        &mut self,
        owner_id: uuid::Uuid,
        until: NaiveDate,
    ) -> ServiceResult<Vec<Task>> {
        Ok(self.sorted(|task| {
            task.owner_id == owner_id && task.is_recurring && !task.completed && task.due_date <= until
        }))
    }

    async fn get(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<Option<Task>> {
        Ok(self
            .tasks
            .iter()
            .find(|task| task.id == id && task.owner_id == owner_id)
            .cloned())
    }

    async fn plant_exists(
        &mut self,
        plant_id: uuid::Uuid,
        owner_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        Ok(self.plants.contains(&(owner_id, plant_id)))
    }

    async fn insert(&mut self, new_task: &NewTask) -> ServiceResult<Task> {
        if self.fail_inserts {
            return Err(ServiceError::DieselError(
                diesel::result::Error::BrokenTransactionManager,
            ));
        }

        self.inserted += 1;
        let created_at = timestamp() + TimeDelta::seconds(self.inserted);
        let task = Task {
            id: new_task.id,
            owner_id: new_task.owner_id,
            plant_id: new_task.plant_id,
            kind: new_task.kind,
            due_date: new_task.due_date,
            completed: new_task.completed,
            completed_date: new_task.completed_date,
            notes: new_task.notes.clone(),
            is_recurring: new_task.is_recurring,
            recurrence_pattern: new_task.recurrence_pattern,
            recurrence_interval: new_task.recurrence_interval,
            next_recurrence: new_task.next_recurrence,
            created_at,
            updated_at: created_at,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&mut self, updated: &Task) -> ServiceResult<Task> {
        let slot = self
            .tasks
            .iter_mut()
            .find(|task| task.id == updated.id && task.owner_id == updated.owner_id)
            .ok_or(ServiceError::DieselError(diesel::result::Error::NotFound))?;
        *slot = updated.clone();
        Ok(slot.clone())
    }

    async fn mark_completed(&mut self, completed: &Task) -> ServiceResult<Option<Task>> {
        let Some(slot) = self
            .tasks
            .iter_mut()
            .find(|task| task.id == completed.id && task.owner_id == completed.owner_id)
        else {
            return Ok(None);
        };

        if self.completed_elsewhere {
            slot.completed = true;
        }
        if slot.completed {
            return Ok(None);
        }

        slot.completed = true;
        slot.completed_date = completed.completed_date;
        slot.next_recurrence = completed.next_recurrence;
        Ok(Some(slot.clone()))
    }

    async fn delete(&mut self, id: uuid::Uuid, owner_id: uuid::Uuid) -> ServiceResult<bool> {
        let before = self.tasks.len();
        self.tasks
            .retain(|task| !(task.id == id && task.owner_id == owner_id));
        Ok(self.tasks.len() < before)
    }
}
