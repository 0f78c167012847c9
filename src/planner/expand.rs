use crate::domain::{new_id, DayType, Progress, RecurringTaskTemplate, Subtask, Task};
use chrono::NaiveDate;

/// Rebuild a day's task list for a day type.
///
/// Returns the manually added tasks of `current`, untouched and in order,
/// followed by one fresh task per template that belongs to one of the day
/// type's categories and occurs on `date`.
///
/// This is destructive: every recurring task already on `current`, along with
/// its completion state, is dropped and regenerated. Selecting the same day
/// type again resets its recurring tasks.
pub fn expand_day_type(
    day_type: &DayType,
    date: NaiveDate,
    templates: &[RecurringTaskTemplate],
    current: &[Task],
) -> Vec<Task> {
    let kept = current.iter().filter(|t| !t.is_recurring).cloned();
    let generated = templates
        .iter()
        .filter(|rt| day_type.includes(&rt.category_id))
        .filter(|rt| rt.occurs_on(date))
        .map(|rt| instantiate(rt, date));

    kept.chain(generated).collect()
}

/// One open task from a template, with the subtasks that occur on `date`
pub fn instantiate(template: &RecurringTaskTemplate, date: NaiveDate) -> Task {
    let subtasks: Vec<Subtask> = template
        .subtasks
        .iter()
        .filter(|st| st.occurs_on(date))
        .map(|st| Subtask::new(st.text.clone()))
        .collect();

    Task {
        id: new_id(),
        text: template.text.clone(),
        category_id: template.category_id.clone(),
        is_recurring: true,
        progress: Progress::from_parts(false, subtasks),
    }
}
