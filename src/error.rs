//! Domain errors raised by planner operations.

use thiserror::Error;

/// Which master-data collection an id failed to resolve against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Category,
    DayType,
    Template,
    SubtaskTemplate,
    Tracker,
    Task,
    Subtask,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RefKind::Category => "category",
            RefKind::DayType => "day type",
            RefKind::Template => "recurring task",
            RefKind::SubtaskTemplate => "recurring subtask",
            RefKind::Tracker => "tracker",
            RefKind::Task => "task",
            RefKind::Subtask => "subtask",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in planner operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Unknown {kind} '{id}'")]
    InvalidReference { kind: RefKind, id: String },

    #[error("Task id '{0}' matches more than one task")]
    AmbiguousReference(String),

    #[error("The '{0}' category cannot be deleted")]
    ProtectedCategory(String),

    #[error("Task '{0}' has subtasks; its completion follows them")]
    DerivedCompletion(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl PlannerError {
    pub fn unknown(kind: RefKind, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
