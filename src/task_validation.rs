use crate::config::{AnalysisOptions, DateRangePolicy};
use crate::error::CriticalPathError;
use crate::task::{Task, TaskId};
use std::collections::HashSet;

pub fn validate_task(task: &Task, options: &AnalysisOptions) -> Result<(), CriticalPathError> {
    if options.date_range_policy == DateRangePolicy::Reject && !task.has_valid_range() {
        return Err(CriticalPathError::InvalidDateRange {
            task_id: task.id.clone(),
            start: task.start_date,
            end: task.end_date,
        });
    }
    Ok(())
}

/// Checks id uniqueness and per-task rules. Dependencies are not checked here:
/// unknown ids are tolerated and cycles are found while ordering the graph.
pub fn validate_task_collection(
    tasks: &[Task],
    options: &AnalysisOptions,
) -> Result<(), CriticalPathError> {
    validate_unique_ids(tasks)?;
    for task in tasks {
        validate_task(task, options)?;
    }
    Ok(())
}

pub fn validate_unique_ids(tasks: &[Task]) -> Result<(), CriticalPathError> {
    let mut seen_ids: HashSet<&TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(&task.id) {
            return Err(CriticalPathError::DuplicateTaskId(task.id.clone()));
        }
    }
    Ok(())
}
