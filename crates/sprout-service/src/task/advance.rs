//! Completion of a task and, for recurring tasks, creation of the next task
//! in the series.

use chrono::NaiveDate;

use sprout_core::recurrence::Recurrence;
use sprout_db::model::task::{NewTask, Task};

use crate::error::{ServiceError, ServiceResult};

/// Outcome of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advancement {
    /// The input task marked completed on the completion date.
    pub completed: Task,
    /// The next open task of a recurring series, still to be inserted.
    pub successor: Option<NewTask>,
}

/// ## Summary
/// Marks `task` completed on `today` and, if it recurs, builds its successor
/// due exactly one step after the completed task's due date.
///
/// The successor keeps the plant, kind, notes and recurrence of the original
/// and is anchored to the schedule, not to the completion date. The completed
/// task records the successor's due date as its `next_recurrence`.
///
/// ## Errors
/// - `Conflict` if the task is already completed.
/// - `InvalidRecurrenceConfig` if its recurrence fields are inconsistent.
/// - `DateOutOfRange` if the next due date does not fit in the calendar.
pub fn advance(task: &Task, today: NaiveDate) -> ServiceResult<Advancement> {
    if task.completed {
        return Err(ServiceError::Conflict(format!(
            "task {} is already completed",
            task.id
        )));
    }

    let recurrence = Recurrence::from_parts(
        task.is_recurring,
        task.recurrence_pattern.map(Into::into),
        task.recurrence_interval,
    )?;

    let mut completed = task.clone();
    completed.completed = true;
    completed.completed_date = Some(today);

    let Some(recurrence) = recurrence else {
        return Ok(Advancement {
            completed,
            successor: None,
        });
    };

    let next_due = recurrence.step(task.due_date)?;
    completed.next_recurrence = Some(next_due);

    let successor = NewTask {
        id: uuid::Uuid::now_v7(),
        owner_id: task.owner_id,
        plant_id: task.plant_id,
        kind: task.kind,
        due_date: next_due,
        completed: false,
        completed_date: None,
        notes: task.notes.clone(),
        is_recurring: true,
        recurrence_pattern: task.recurrence_pattern,
        recurrence_interval: task.recurrence_interval,
        next_recurrence: None,
    };

    tracing::debug!(
        task_id = %task.id,
        successor_id = %successor.id,
        %next_due,
        "Advanced recurring task"
    );

    Ok(Advancement {
        completed,
        successor: Some(successor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::testing::{date, monthly_task, recurring_task, task};
    use sprout_core::error::CoreError;
    use sprout_db::db::enums::RecurrencePattern;

    #[test_log::test]
    fn test_weekly_task_advances_one_step_from_due_date() {
        let original = recurring_task(date(2024, 1, 1), RecurrencePattern::Weekly, 2);
        let advancement = advance(&original, date(2024, 1, 3)).expect("advances");

        let successor = advancement.successor.expect("recurring task has a successor");
        assert_eq!(successor.due_date, date(2024, 1, 15));
        assert!(!successor.completed);
        assert_eq!(successor.completed_date, None);
        assert!(successor.is_recurring);
        assert_eq!(successor.recurrence_pattern, Some(RecurrencePattern::Weekly));
        assert_eq!(successor.recurrence_interval, Some(2));
        assert_eq!(successor.plant_id, original.plant_id);
        assert_eq!(successor.owner_id, original.owner_id);
        assert_eq!(successor.kind, original.kind);
        assert_ne!(successor.id, original.id);

        assert!(advancement.completed.completed);
        assert_eq!(advancement.completed.completed_date, Some(date(2024, 1, 3)));
        assert_eq!(advancement.completed.next_recurrence, Some(date(2024, 1, 15)));
        assert_eq!(advancement.completed.id, original.id);
    }

    #[test_log::test]
    fn test_completion_date_does_not_shift_schedule() {
        let original = monthly_task(date(2024, 1, 10));
        let late = advance(&original, date(2024, 1, 25)).expect("advances");

        let successor = late.successor.expect("successor");
        assert_eq!(successor.due_date, date(2024, 2, 10));
    }

    #[test_log::test]
    fn test_month_end_clamps_successor() {
        let original = monthly_task(date(2023, 1, 31));
        let successor = advance(&original, date(2023, 1, 31))
            .expect("advances")
            .successor
            .expect("successor");

        assert_eq!(successor.due_date, date(2023, 2, 28));
    }

    #[test_log::test]
    fn test_successor_copies_notes() {
        let original = Task {
            notes: Some("Use rainwater".to_string()),
            ..monthly_task(date(2024, 1, 10))
        };
        let successor = advance(&original, date(2024, 1, 10))
            .expect("advances")
            .successor
            .expect("successor");

        assert_eq!(successor.notes.as_deref(), Some("Use rainwater"));
        assert_eq!(successor.next_recurrence, None);
    }

    #[test_log::test]
    fn test_non_recurring_task_only_completes() {
        let original = task(date(2024, 1, 10));
        let advancement = advance(&original, date(2024, 1, 11)).expect("advances");

        assert!(advancement.successor.is_none());
        assert!(advancement.completed.completed);
        assert_eq!(advancement.completed.completed_date, Some(date(2024, 1, 11)));
        assert_eq!(advancement.completed.next_recurrence, None);
    }

    #[test_log::test]
    fn test_completed_task_is_a_conflict() {
        let original = Task {
            completed: true,
            completed_date: Some(date(2024, 1, 10)),
            ..task(date(2024, 1, 10))
        };

        assert!(matches!(
            advance(&original, date(2024, 1, 11)),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test_log::test]
    fn test_inconsistent_recurrence_is_rejected() {
        let missing_interval = Task {
            recurrence_interval: None,
            ..monthly_task(date(2024, 1, 10))
        };
        let zero_interval = recurring_task(date(2024, 1, 10), RecurrencePattern::Daily, 0);

        for original in [missing_interval, zero_interval] {
            assert!(matches!(
                advance(&original, date(2024, 1, 10)),
                Err(ServiceError::CoreError(CoreError::InvalidRecurrenceConfig(_)))
            ));
        }
    }

    #[test_log::test]
    fn test_step_past_calendar_end_is_reported() {
        let original = recurring_task(NaiveDate::MAX, RecurrencePattern::Daily, 1);

        assert!(matches!(
            advance(&original, date(2024, 1, 10)),
            Err(ServiceError::CoreError(CoreError::DateOutOfRange(_)))
        ));
    }
}
