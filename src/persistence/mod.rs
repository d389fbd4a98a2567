use crate::error::CriticalPathError;
use crate::project::ProjectRegistry;
use crate::task::Task;
use crate::task_validation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no project stored under '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Analysis(#[from] CriticalPathError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Where task lists come from. The portal backend is one implementation
/// outside this crate; the registry and the SQLite store are the ones here.
pub trait TaskSource {
    fn load_tasks(&self, project_id: &str) -> PersistenceResult<Vec<Task>>;
}

impl TaskSource for ProjectRegistry {
    fn load_tasks(&self, project_id: &str) -> PersistenceResult<Vec<Task>> {
        self.get(project_id)
            .map(|project| project.tasks.clone())
            .ok_or_else(|| PersistenceError::NotFound(project_id.to_string()))
    }
}

pub fn validate_tasks(tasks: &[Task]) -> PersistenceResult<()> {
    task_validation::validate_unique_ids(tasks)?;
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_project_from_json, load_projects_from_json, load_tasks_from_csv, save_project_to_json,
    save_projects_to_json, save_tasks_to_csv,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use chrono::NaiveDate;

    #[test]
    fn registry_serves_tasks_by_project() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let registry = ProjectRegistry::from_projects([
            Project::new("p1", "Audit").with_tasks(vec![Task::new(1, day, day)])
        ]);

        assert_eq!(registry.load_tasks("p1").unwrap().len(), 1);
        let err = registry.load_tasks("missing").unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(ref id) if id == "missing"));
    }

    #[test]
    fn duplicate_ids_are_invalid() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let tasks = vec![Task::new("a", day, day), Task::new("a", day, day)];
        assert!(matches!(
            validate_tasks(&tasks),
            Err(PersistenceError::Analysis(CriticalPathError::DuplicateTaskId(_)))
        ));
    }
}
