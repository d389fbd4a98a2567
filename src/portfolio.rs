use crate::analysis::{CriticalPathAnalysis, analyze};
use crate::config::AnalysisOptions;
use crate::error::CriticalPathError;
use crate::project::Project;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    pub project_id: String,
    pub result: Result<CriticalPathAnalysis, CriticalPathError>,
}

/// Analyses each project independently and in parallel. Results keep the
/// input order; a bad task list only fails its own project.
pub fn analyze_portfolio(projects: &[Project], options: &AnalysisOptions) -> Vec<ProjectAnalysis> {
    projects
        .par_iter()
        .map(|project| ProjectAnalysis {
            project_id: project.id.clone(),
            result: analyze(&project.tasks, options),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    #[test]
    fn failures_stay_with_their_project() {
        let projects = vec![
            Project::new("ok", "Fine").with_tasks(vec![
                Task::new(1, d(1), d(3)),
                Task::new(2, d(4), d(4)).with_dependencies([1]),
            ]),
            Project::new("loop", "Cyclic").with_tasks(vec![
                Task::new(1, d(1), d(3)).with_dependencies([2]),
                Task::new(2, d(4), d(4)).with_dependencies([1]),
            ]),
            Project::new("empty", "Nothing yet"),
        ];

        let results = analyze_portfolio(&projects, &AnalysisOptions::default());
        let ids: Vec<&str> = results.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "loop", "empty"]);

        let ok = results[0].result.as_ref().unwrap();
        assert!(ok.is_critical(&TaskId::from(1)));
        assert!(ok.is_critical(&TaskId::from(2)));
        assert!(matches!(
            results[1].result,
            Err(CriticalPathError::CircularDependency { .. })
        ));
        assert!(results[2].result.as_ref().unwrap().timings.is_empty());
    }
}
