use super::completion::completion_percentage;
use crate::domain::{DailyLog, Subtask, Task};
use crate::error::{PlannerError, RefKind, Result};

/// Resolve an exact id or a unique id prefix to an index
fn position_by_prefix<'a, I>(ids: I, wanted: &str, kind: RefKind) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    if wanted.is_empty() {
        return Err(PlannerError::unknown(kind, wanted));
    }
    let mut found = None;
    for (idx, id) in ids.into_iter().enumerate() {
        if id == wanted {
            return Ok(idx);
        }
        if id.starts_with(wanted) {
            if found.is_some() {
                return Err(PlannerError::AmbiguousReference(wanted.to_string()));
            }
            found = Some(idx);
        }
    }
    found.ok_or_else(|| PlannerError::unknown(kind, wanted))
}

impl DailyLog {
    /// Index of a task by id or unique id prefix
    pub fn task_index(&self, task_id: &str) -> Result<usize> {
        position_by_prefix(self.tasks.iter().map(|t| t.id.as_str()), task_id, RefKind::Task)
    }

    pub fn task(&self, task_id: &str) -> Result<&Task> {
        let idx = self.task_index(task_id)?;
        Ok(&self.tasks[idx])
    }

    fn task_mut(&mut self, task_id: &str) -> Result<&mut Task> {
        let idx = self.task_index(task_id)?;
        Ok(&mut self.tasks[idx])
    }

    /// Append a manual task and return its id
    pub fn add_task(&mut self, text: impl Into<String>, category_id: impl Into<String>) -> String {
        let task = Task::new(text, category_id);
        let id = task.id.clone();
        self.tasks.push(task);
        id
    }

    pub fn toggle_task(&mut self, task_id: &str) -> Result<()> {
        self.task_mut(task_id)?.toggle()
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<()> {
        let task = self.task_mut(task_id)?;
        let idx = position_by_prefix(
            task.subtasks().iter().map(|st| st.id.as_str()),
            subtask_id,
            RefKind::Subtask,
        )?;
        let full_id = task.subtasks()[idx].id.clone();
        task.toggle_subtask(&full_id)
    }

    /// Remove a task and return it
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let idx = self.task_index(task_id)?;
        Ok(self.tasks.remove(idx))
    }

    /// Append a subtask and return its id
    pub fn add_subtask(&mut self, task_id: &str, text: impl Into<String>) -> Result<String> {
        let subtask = Subtask::new(text);
        let id = subtask.id.clone();
        self.task_mut(task_id)?.add_subtask(subtask);
        Ok(id)
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<()> {
        let task = self.task_mut(task_id)?;
        let idx = position_by_prefix(
            task.subtasks().iter().map(|st| st.id.as_str()),
            subtask_id,
            RefKind::Subtask,
        )?;
        let full_id = task.subtasks()[idx].id.clone();
        task.remove_subtask(&full_id)
    }

    /// Weighted completion of this day's tasks
    pub fn completion(&self) -> f64 {
        completion_percentage(&self.tasks)
    }

    /// Tasks of one category, in list order
    pub fn tasks_in_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.category_id == category_id)
    }
}
