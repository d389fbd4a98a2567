pub mod analysis;
pub mod calculations;
pub mod config;
pub mod error;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod portfolio;
pub mod project;
pub mod report;
pub mod task;
pub(crate) mod task_validation;

pub use analysis::{
    AnalysisSummary, CriticalPathAnalysis, TaskTiming, TimingRow, analyze, critical_path,
    critical_path_with_options,
};
pub use config::{AnalysisOptions, ConfigError, DateRangePolicy, ServerConfig};
pub use error::CriticalPathError;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteTaskStore;
pub use persistence::{
    PersistenceError, TaskSource, load_project_from_json, load_projects_from_json,
    load_tasks_from_csv, save_project_to_json, save_projects_to_json, save_tasks_to_csv,
    validate_tasks,
};
pub use portfolio::{ProjectAnalysis, analyze_portfolio};
pub use project::{Project, ProjectRegistry};
pub use report::{analysis_dataframe, render_table};
pub use task::{Task, TaskId};
