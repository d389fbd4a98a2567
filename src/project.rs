use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Projects keyed by id. Owned by whoever serves them (the HTTP state, a
/// test) and passed in explicitly; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: BTreeMap<String, Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_projects<I: IntoIterator<Item = Project>>(projects: I) -> Self {
        let mut registry = Self::new();
        for project in projects {
            registry.upsert(project);
        }
        registry
    }

    /// Returns the project previously stored under the same id.
    pub fn upsert(&mut self, project: Project) -> Option<Project> {
        self.projects.insert(project.id.clone(), project)
    }

    pub fn get(&self, project_id: &str) -> Option<&Project> {
        self.projects.get(project_id)
    }

    pub fn remove(&mut self, project_id: &str) -> Option<Project> {
        self.projects.remove(project_id)
    }

    /// Replaces the task list, creating the project if needed.
    pub fn set_tasks(&mut self, project_id: &str, tasks: Vec<Task>) {
        self.projects
            .entry(project_id.to_string())
            .or_insert_with(|| Project::new(project_id, ""))
            .tasks = tasks;
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
