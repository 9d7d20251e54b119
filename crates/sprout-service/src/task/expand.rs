//! Expansion of a recurring task into the occurrences that fall inside a
//! query window.

use chrono::NaiveDate;

use sprout_core::recurrence::Recurrence;
use sprout_db::model::task::Task;

use crate::error::ServiceResult;
use crate::task::entry::SyntheticInstance;

/// ## Summary
/// Returns the synthetic instances of `template` due strictly after its own
/// due date and on or before `window_end`, in ascending date order.
///
/// Non-recurring and completed tasks expand to nothing, as do recurring tasks
/// missing their pattern or interval. The result depends only on the inputs.
///
/// ## Errors
/// Returns `InvalidRecurrenceConfig` if the stored interval is less than 1.
pub fn expand(template: &Task, window_end: NaiveDate) -> ServiceResult<Vec<SyntheticInstance>> {
    expand_between(template, NaiveDate::MIN, window_end)
}

/// ## Summary
/// Like [`expand`], but only builds the instances due on or after
/// `window_start`. Earlier occurrences are skipped without being materialized.
///
/// ## Errors
/// Returns `InvalidRecurrenceConfig` if the stored interval is less than 1.
pub fn expand_between(
    template: &Task,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> ServiceResult<Vec<SyntheticInstance>> {
    let Some(recurrence) = open_recurrence(template)? else {
        return Ok(Vec::new());
    };

    let instances: Vec<SyntheticInstance> = recurrence
        .occurrences_between(template.due_date, window_start, window_end)
        .map(|due_date| SyntheticInstance::from_template(template, recurrence, due_date))
        .collect();

    tracing::trace!(
        template_id = %template.id,
        %window_start,
        %window_end,
        count = instances.len(),
        "Expanded recurring task"
    );

    Ok(instances)
}

fn open_recurrence(template: &Task) -> ServiceResult<Option<Recurrence>> {
    if !template.is_recurring || template.completed {
        return Ok(None);
    }

    let (Some(pattern), Some(interval)) =
        (template.recurrence_pattern, template.recurrence_interval)
    else {
        return Ok(None);
    };

    Ok(Some(Recurrence::new(pattern.into(), interval)?))
}
