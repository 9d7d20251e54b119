use sprout_core::error::CoreError;
use sprout_db::db::enums::{RecurrencePattern, TaskKind};
use sprout_db::model::task::Task;

use super::entry::TaskEntry;
use super::query::{DateWindow, TaskQuery, list_tasks};
use super::service::{
    CreateTask, UpdateTask, complete_task, create_task, delete_task, restore_next_recurrence,
    update_task,
};
use super::testing::{
    MemoryTaskStore, OTHER_OWNER, OWNER, PLANT, date, monthly_task, recurring_task, task,
};
use crate::error::ServiceError;

fn create_request(due: chrono::NaiveDate) -> CreateTask {
    CreateTask {
        plant_id: PLANT,
        kind: TaskKind::Fertilizing,
        due_date: due,
        notes: None,
        is_recurring: false,
        recurrence_pattern: None,
        recurrence_interval: None,
    }
}

#[test]
fn test_restore_next_recurrence() {
    let due = date(2024, 3, 1);
    let cached = Some(date(2024, 4, 1));

    assert_eq!(restore_next_recurrence(false, due, cached, false), None);
    assert_eq!(restore_next_recurrence(true, due, None, false), Some(due));
    assert_eq!(restore_next_recurrence(true, due, cached, false), cached);
    assert_eq!(restore_next_recurrence(true, due, cached, true), Some(due));
}

#[test]
fn test_create_payload_accepts_timestamps_and_defaults() {
    let request: CreateTask = serde_json::from_value(serde_json::json!({
        "plant_id": PLANT,
        "kind": "watering",
        "due_date": "2024-01-10T00:00:00.000Z",
    }))
    .expect("payload parses");

    assert_eq!(request.due_date, date(2024, 1, 10));
    assert!(!request.is_recurring);
    assert_eq!(request.recurrence_pattern, None);

    assert!(
        serde_json::from_value::<CreateTask>(serde_json::json!({
            "plant_id": PLANT,
            "kind": "repotting",
            "due_date": "2024-01-10",
        }))
        .is_err()
    );
}

#[test_log::test(tokio::test)]
async fn test_create_one_off_task() {
    let mut store = MemoryTaskStore::with_plant();

    let created = create_task(&mut store, OWNER, create_request(date(2024, 1, 10)))
        .await
        .expect("creates");

    assert_eq!(created.owner_id, OWNER);
    assert_eq!(created.kind, TaskKind::Fertilizing);
    assert!(!created.completed);
    assert_eq!(created.next_recurrence, None);
    assert_eq!(store.stored(created.id), Some(&created));
}

#[test_log::test(tokio::test)]
async fn test_create_recurring_task_caches_next_recurrence() {
    let mut store = MemoryTaskStore::with_plant();
    let request = CreateTask {
        is_recurring: true,
        recurrence_pattern: Some(RecurrencePattern::Weekly),
        recurrence_interval: Some(2),
        ..create_request(date(2024, 1, 1))
    };

    let created = create_task(&mut store, OWNER, request).await.expect("creates");

    assert!(created.is_recurring);
    assert_eq!(created.next_recurrence, Some(date(2024, 1, 1)));
}

#[test_log::test(tokio::test)]
async fn test_create_rejects_inconsistent_recurrence() {
    let mut store = MemoryTaskStore::with_plant();
    let requests = [
        CreateTask {
            is_recurring: true,
            recurrence_pattern: Some(RecurrencePattern::Daily),
            ..create_request(date(2024, 1, 1))
        },
        CreateTask {
            is_recurring: true,
            recurrence_pattern: Some(RecurrencePattern::Daily),
            recurrence_interval: Some(0),
            ..create_request(date(2024, 1, 1))
        },
        CreateTask {
            recurrence_pattern: Some(RecurrencePattern::Daily),
            recurrence_interval: Some(1),
            ..create_request(date(2024, 1, 1))
        },
    ];

    for request in requests {
        let result = create_task(&mut store, OWNER, request).await;
        assert!(matches!(
            result,
            Err(ServiceError::CoreError(CoreError::InvalidRecurrenceConfig(_)))
        ));
    }
    assert!(store.tasks.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_create_requires_owned_plant() {
    let mut store = MemoryTaskStore::with_plant();

    let result = create_task(&mut store, OTHER_OWNER, create_request(date(2024, 1, 1))).await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
    assert!(store.tasks.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_complete_recurring_task_creates_successor() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(recurring_task(date(2024, 1, 1), RecurrencePattern::Weekly, 2));

    let completion = complete_task(&mut store, OWNER, original.id, date(2024, 1, 3))
        .await
        .expect("completes");

    assert!(completion.completed.completed);
    assert_eq!(completion.completed.completed_date, Some(date(2024, 1, 3)));
    assert_eq!(completion.completed.next_recurrence, Some(date(2024, 1, 15)));

    let successor = completion.successor.expect("successor");
    assert_eq!(successor.due_date, date(2024, 1, 15));
    assert!(!successor.completed);
    assert!(successor.is_recurring);
    assert_eq!(successor.recurrence_interval, Some(2));

    assert_eq!(store.tasks.len(), 2);
    assert_eq!(store.stored(original.id), Some(&completion.completed));
}

#[test_log::test(tokio::test)]
async fn test_completed_series_lists_successor_once() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(monthly_task(date(2024, 1, 10)));

    complete_task(&mut store, OWNER, original.id, date(2024, 1, 12))
        .await
        .expect("completes");

    let query = TaskQuery {
        window: Some(DateWindow::new(date(2024, 1, 1), date(2024, 4, 1)).expect("window")),
        ..TaskQuery::default()
    };
    let entries = list_tasks(&mut store, OWNER, &query, date(2024, 1, 12))
        .await
        .expect("lists");

    let summary: Vec<_> = entries
        .iter()
        .map(|entry| (entry.due_date(), entry.is_synthetic()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (date(2024, 1, 10), false),
            (date(2024, 2, 10), false),
            (date(2024, 3, 10), true),
        ]
    );
    assert!(matches!(&entries[0], TaskEntry::Persisted(task) if task.completed));
}

#[test_log::test(tokio::test)]
async fn test_complete_one_off_task() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(task(date(2024, 1, 10)));

    let completion = complete_task(&mut store, OWNER, original.id, date(2024, 1, 9))
        .await
        .expect("completes");

    assert!(completion.successor.is_none());
    assert_eq!(completion.completed.completed_date, Some(date(2024, 1, 9)));
    assert_eq!(store.tasks.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_completing_twice_is_a_conflict() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(monthly_task(date(2024, 1, 10)));

    complete_task(&mut store, OWNER, original.id, date(2024, 1, 10))
        .await
        .expect("completes");
    let again = complete_task(&mut store, OWNER, original.id, date(2024, 1, 11)).await;

    assert!(matches!(again, Err(ServiceError::Conflict(_))));
    assert_eq!(store.tasks.len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_concurrent_completion_spawns_no_second_successor() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(monthly_task(date(2024, 1, 10)));
    store.completed_elsewhere = true;

    let result = complete_task(&mut store, OWNER, original.id, date(2024, 1, 10)).await;

    assert!(matches!(result, Err(ServiceError::Conflict(_))));
    assert_eq!(store.tasks.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_complete_unknown_or_foreign_task_is_not_found() {
    let mut store = MemoryTaskStore::with_plant();
    let foreign = store.seed(Task {
        owner_id: OTHER_OWNER,
        ..task(date(2024, 1, 10))
    });

    for id in [uuid::Uuid::now_v7(), foreign.id] {
        let result = complete_task(&mut store, OWNER, id, date(2024, 1, 10)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
    assert_eq!(store.stored(foreign.id), Some(&foreign));
}

#[test_log::test(tokio::test)]
async fn test_failed_successor_insert_is_transient() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(monthly_task(date(2024, 1, 10)));
    store.fail_inserts = true;

    let result = complete_task(&mut store, OWNER, original.id, date(2024, 1, 10)).await;

    assert!(matches!(result, Err(ServiceError::TransientPersistence(_))));
    assert_eq!(store.tasks.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_update_due_date_resets_next_recurrence() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(Task {
        next_recurrence: Some(date(2024, 2, 10)),
        ..monthly_task(date(2024, 1, 10))
    });

    let notes_only = UpdateTask {
        notes: Some(Some("Bottom water".to_string())),
        ..UpdateTask::default()
    };
    let updated = update_task(&mut store, OWNER, original.id, notes_only)
        .await
        .expect("updates");
    assert_eq!(updated.notes.as_deref(), Some("Bottom water"));
    assert_eq!(updated.next_recurrence, Some(date(2024, 2, 10)));

    let moved = UpdateTask {
        due_date: Some(date(2024, 1, 20)),
        ..UpdateTask::default()
    };
    let updated = update_task(&mut store, OWNER, original.id, moved)
        .await
        .expect("updates");
    assert_eq!(updated.due_date, date(2024, 1, 20));
    assert_eq!(updated.next_recurrence, Some(date(2024, 1, 20)));
}

#[test_log::test(tokio::test)]
async fn test_update_null_notes_clears_them() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(Task {
        notes: Some("Use rainwater".to_string()),
        ..task(date(2024, 1, 10))
    });

    let untouched: UpdateTask = serde_json::from_str(r#"{"kind":"pruning"}"#).expect("parses");
    let updated = update_task(&mut store, OWNER, original.id, untouched)
        .await
        .expect("updates");
    assert_eq!(updated.notes.as_deref(), Some("Use rainwater"));

    let cleared: UpdateTask = serde_json::from_str(r#"{"notes":null}"#).expect("parses");
    let updated = update_task(&mut store, OWNER, original.id, cleared)
        .await
        .expect("updates");
    assert_eq!(updated.notes, None);
    assert_eq!(updated.kind, TaskKind::Pruning);
}

#[test_log::test(tokio::test)]
async fn test_update_turning_off_recurrence_clears_fields() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(monthly_task(date(2024, 1, 10)));

    let changes = UpdateTask {
        is_recurring: Some(false),
        ..UpdateTask::default()
    };
    let updated = update_task(&mut store, OWNER, original.id, changes)
        .await
        .expect("updates");

    assert!(!updated.is_recurring);
    assert_eq!(updated.recurrence_pattern, None);
    assert_eq!(updated.recurrence_interval, None);
    assert_eq!(updated.next_recurrence, None);
}

#[test_log::test(tokio::test)]
async fn test_update_rejects_inconsistent_recurrence() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(task(date(2024, 1, 10)));

    let half_recurring = UpdateTask {
        is_recurring: Some(true),
        recurrence_pattern: Some(RecurrencePattern::Daily),
        ..UpdateTask::default()
    };
    let result = update_task(&mut store, OWNER, original.id, half_recurring).await;

    assert!(matches!(
        result,
        Err(ServiceError::CoreError(CoreError::InvalidRecurrenceConfig(_)))
    ));
    assert_eq!(store.stored(original.id), Some(&original));
}

#[test_log::test(tokio::test)]
async fn test_update_to_unknown_plant_is_not_found() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(task(date(2024, 1, 10)));

    let changes = UpdateTask {
        plant_id: Some(uuid::Uuid::now_v7()),
        ..UpdateTask::default()
    };
    let result = update_task(&mut store, OWNER, original.id, changes).await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[test_log::test(tokio::test)]
async fn test_delete_task() {
    let mut store = MemoryTaskStore::with_plant();
    let original = store.seed(task(date(2024, 1, 10)));

    delete_task(&mut store, OWNER, original.id)
        .await
        .expect("deletes");
    assert!(store.tasks.is_empty());

    let again = delete_task(&mut store, OWNER, original.id).await;
    assert!(matches!(again, Err(ServiceError::NotFound(_))));
}
