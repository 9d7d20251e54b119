//! Task entries returned by the read workflows.
//!
//! A listing mixes persisted tasks with synthetic instances derived from
//! recurring tasks. Synthetic instances are never stored and cannot be
//! completed, edited or deleted.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};

use sprout_core::recurrence::Recurrence;
use sprout_db::db::enums::{RecurrencePattern, TaskKind};
use sprout_db::model::task::Task;

/// A derived occurrence of a recurring task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticInstance {
    /// The recurring task this occurrence was derived from.
    pub template_id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub plant_id: uuid::Uuid,
    pub kind: TaskKind,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub recurrence: Recurrence,
}

impl SyntheticInstance {
    pub(crate) fn from_template(
        template: &Task,
        recurrence: Recurrence,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            template_id: template.id,
            owner_id: template.owner_id,
            plant_id: template.plant_id,
            kind: template.kind,
            due_date,
            notes: template.notes.clone(),
            recurrence,
        }
    }

    /// ## Summary
    /// Returns the identifier clients see for this instance:
    /// `{template_id}_{due date as epoch milliseconds at UTC midnight}`.
    ///
    /// The identifier is stable for a given template and due date.
    #[must_use]
    pub fn wire_id(&self) -> String {
        format!("{}_{}", self.template_id, epoch_millis(self.due_date))
    }
}

fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// One row of a task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEntry {
    Persisted(Task),
    Synthetic(SyntheticInstance),
}

impl TaskEntry {
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        match self {
            Self::Persisted(task) => task.due_date,
            Self::Synthetic(instance) => instance.due_date,
        }
    }

    #[must_use]
    pub const fn plant_id(&self) -> uuid::Uuid {
        match self {
            Self::Persisted(task) => task.plant_id,
            Self::Synthetic(instance) => instance.plant_id,
        }
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

/// Wire shape shared by persisted and synthetic entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: String,
    pub is_synthetic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<uuid::Uuid>,
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
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            is_synthetic: false,
            template_id: None,
            owner_id: task.owner_id,
            plant_id: task.plant_id,
            kind: task.kind,
            due_date: task.due_date,
            completed: task.completed,
            completed_date: task.completed_date,
            notes: task.notes.clone(),
            is_recurring: task.is_recurring,
            recurrence_pattern: task.recurrence_pattern,
            recurrence_interval: task.recurrence_interval,
            next_recurrence: task.next_recurrence,
            created_at: Some(task.created_at),
            updated_at: Some(task.updated_at),
        }
    }
}

impl From<&SyntheticInstance> for TaskView {
    fn from(instance: &SyntheticInstance) -> Self {
        Self {
            id: instance.wire_id(),
            is_synthetic: true,
            template_id: Some(instance.template_id),
            owner_id: instance.owner_id,
            plant_id: instance.plant_id,
            kind: instance.kind,
            due_date: instance.due_date,
            completed: false,
            completed_date: None,
            notes: instance.notes.clone(),
            is_recurring: true,
            recurrence_pattern: Some(instance.recurrence.pattern().into()),
            recurrence_interval: i32::try_from(instance.recurrence.interval().get()).ok(),
            next_recurrence: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<&TaskEntry> for TaskView {
    fn from(entry: &TaskEntry) -> Self {
        match entry {
            TaskEntry::Persisted(task) => task.into(),
            TaskEntry::Synthetic(instance) => instance.into(),
        }
    }
}

impl Serialize for TaskEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaskView::from(self).serialize(serializer)
    }
}
