use crate::error::{PlannerError, RefKind, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fresh id for a task or subtask instance
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A checklist entry inside a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Where a task's completion comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Completion is stored on the task itself
    Simple { completed: bool },
    /// Completion is derived from the subtasks (never empty)
    Composite { subtasks: Vec<Subtask> },
}

impl Progress {
    /// Build from the stored shape; an empty subtask list is a simple task
    pub fn from_parts(completed: bool, subtasks: Vec<Subtask>) -> Self {
        if subtasks.is_empty() {
            Progress::Simple { completed }
        } else {
            Progress::Composite { subtasks }
        }
    }
}

/// A concrete task on one day's list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub category_id: String,
    /// Instantiated from a recurring template (replaced on day-type selection)
    pub is_recurring: bool,
    pub progress: Progress,
}

impl Task {
    /// A manually added task without subtasks
    pub fn new(text: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            category_id: category_id.into(),
            is_recurring: false,
            progress: Progress::Simple { completed: false },
        }
    }

    /// Whether the task counts as done
    pub fn completed(&self) -> bool {
        match &self.progress {
            Progress::Simple { completed } => *completed,
            Progress::Composite { subtasks } => {
                !subtasks.is_empty() && subtasks.iter().all(|st| st.completed)
            }
        }
    }

    pub fn subtasks(&self) -> &[Subtask] {
        match &self.progress {
            Progress::Simple { .. } => &[],
            Progress::Composite { subtasks } => subtasks,
        }
    }

    pub fn has_subtasks(&self) -> bool {
        matches!(self.progress, Progress::Composite { .. })
    }

    /// Flip a simple task; tasks with subtasks refuse
    pub fn toggle(&mut self) -> Result<()> {
        match &mut self.progress {
            Progress::Simple { completed } => {
                *completed = !*completed;
                Ok(())
            }
            Progress::Composite { .. } => Err(PlannerError::DerivedCompletion(self.id.clone())),
        }
    }

    /// Flip one subtask; the task's completion follows
    pub fn toggle_subtask(&mut self, subtask_id: &str) -> Result<()> {
        let subtask = match &mut self.progress {
            Progress::Composite { subtasks } => subtasks.iter_mut().find(|st| st.id == subtask_id),
            Progress::Simple { .. } => None,
        };
        match subtask {
            Some(st) => {
                st.completed = !st.completed;
                Ok(())
            }
            None => Err(PlannerError::unknown(RefKind::Subtask, subtask_id)),
        }
    }

    /// Append a subtask; a simple task becomes composite and therefore incomplete
    pub fn add_subtask(&mut self, subtask: Subtask) {
        match &mut self.progress {
            Progress::Composite { subtasks } => subtasks.push(subtask),
            Progress::Simple { .. } => {
                self.progress = Progress::Composite {
                    subtasks: vec![subtask],
                }
            }
        }
    }

    /// Remove a subtask; removing the last one keeps the completion it had
    pub fn remove_subtask(&mut self, subtask_id: &str) -> Result<()> {
        let was_completed = self.completed();
        let Progress::Composite { subtasks } = &mut self.progress else {
            return Err(PlannerError::unknown(RefKind::Subtask, subtask_id));
        };
        let before = subtasks.len();
        subtasks.retain(|st| st.id != subtask_id);
        if subtasks.len() == before {
            return Err(PlannerError::unknown(RefKind::Subtask, subtask_id));
        }
        if subtasks.is_empty() {
            self.progress = Progress::Simple {
                completed: was_completed,
            };
        }
        Ok(())
    }
}

/// Stored shape of a task: `completed` is written out even when derived
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    text: String,
    #[serde(default)]
    completed: bool,
    category_id: String,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtasks: Option<Vec<Subtask>>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            category_id: record.category_id,
            is_recurring: record.is_recurring,
            progress: Progress::from_parts(record.completed, record.subtasks.unwrap_or_default()),
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let completed = task.completed();
        let subtasks = match task.progress {
            Progress::Simple { .. } => Vec::new(),
            Progress::Composite { subtasks } => subtasks,
        };
        Self {
            id: task.id,
            text: task.text,
            completed,
            category_id: task.category_id,
            is_recurring: task.is_recurring,
            subtasks: Some(subtasks),
        }
    }
}

/// One calendar day's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,
    pub day_type_id: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl DailyLog {
    /// The lazily created default for a date
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            day_type_id: None,
            tasks: Vec::new(),
        }
    }
}
