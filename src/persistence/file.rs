use super::{PersistenceError, PersistenceResult};
use crate::project::Project;
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// A project file holds either a full project or just its task array, the
/// shape the portal backend returns from its task listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectFile {
    Project(Project),
    Tasks(Vec<Task>),
}

pub fn save_project_to_json<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    super::validate_tasks(&project.tasks)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, project)?;
    Ok(())
}

/// Loads a project object or a bare task array. A bare array becomes a
/// project whose id is the file stem.
pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let project = match serde_json::from_reader(file)? {
        ProjectFile::Project(project) => project,
        ProjectFile::Tasks(tasks) => {
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            Project::new(id, "").with_tasks(tasks)
        }
    };
    super::validate_tasks(&project.tasks)?;
    Ok(project)
}

pub fn save_projects_to_json<P: AsRef<Path>>(
    projects: &[Project],
    path: P,
) -> PersistenceResult<()> {
    for project in projects {
        super::validate_tasks(&project.tasks)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, projects)?;
    Ok(())
}

pub fn load_projects_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Project>> {
    let file = File::open(path)?;
    let projects: Vec<Project> = serde_json::from_reader(file)?;
    for project in &projects {
        super::validate_tasks(&project.tasks).map_err(|err| {
            PersistenceError::InvalidData(format!("project '{}': {err}", project.id))
        })?;
    }
    Ok(projects)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: String,
    #[serde(default)]
    name: String,
    start_date: String,
    end_date: String,
    #[serde(default)]
    dependencies: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        TaskCsvRecord {
            id: task.id.to_string(),
            name: task.name.clone().unwrap_or_default(),
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
            dependencies: join_ids(&task.dependencies),
        }
    }
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<Task> {
        if self.id.trim().is_empty() {
            return Err(PersistenceError::InvalidData("task row missing id".into()));
        }
        let id = parse_id(&self.id);
        let mut task = Task::new(id, parse_date(&self.start_date)?, parse_date(&self.end_date)?);
        task.name = parse_string_option(self.name);
        task.dependencies = split_ids(&self.dependencies);
        Ok(task)
    }
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    super::validate_tasks(tasks)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn parse_id(input: &str) -> TaskId {
    match input.parse::<TaskId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

fn join_ids(values: &[TaskId]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_ids(input: &str) -> Vec<TaskId> {
    input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_id)
        .collect()
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
