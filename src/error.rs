use crate::task::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a task list cannot be analysed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriticalPathError {
    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),

    #[error("task {task_id} ends on {end} before it starts on {start}")]
    InvalidDateRange {
        task_id: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("circular dependency detected at task {task_id}")]
    CircularDependency { task_id: TaskId },
}

pub type Result<T> = std::result::Result<T, CriticalPathError>;
