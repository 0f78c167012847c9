use crate::domain::Task;

/// Weighted completion of a task list, 0.0 to 100.0
///
/// Every task carries an equal share of 100. A task with subtasks earns the
/// fraction of its share matching its completed subtasks; a simple task earns
/// all or nothing. The result is not rounded so callers can average it.
pub fn completion_percentage(tasks: &[Task]) -> f64 {
    completion_of(tasks.iter())
}

/// Same as [`completion_percentage`] over any borrowed selection of tasks
pub fn completion_of<'a, I>(tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut total = 0usize;
    let mut earned = 0.0;

    for task in tasks {
        total += 1;
        let subtasks = task.subtasks();
        if !subtasks.is_empty() {
            let done = subtasks.iter().filter(|st| st.completed).count();
            earned += done as f64 / subtasks.len() as f64;
        } else if task.completed() {
            earned += 1.0;
        }
    }

    if total == 0 {
        return 0.0;
    }
    earned * 100.0 / total as f64
}
