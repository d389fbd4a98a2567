#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use critical_path::{
    CriticalPathError, PersistenceError, Project, SqliteTaskStore, Task, TaskId, TaskSource,
    critical_path,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_project(id: &str) -> Project {
    Project::new(id, "Warehouse").with_tasks(vec![
        Task::new(1, d(2025, 4, 1), d(2025, 4, 5)).with_name("Foundations"),
        Task::new(2, d(2025, 4, 6), d(2025, 4, 10)).with_dependencies([1]),
        Task::new("roof", d(2025, 4, 6), d(2025, 4, 7)).with_dependencies([1]),
    ])
}

#[test]
fn sqlite_store_round_trip_project() {
    let file = NamedTempFile::new().unwrap();
    let project = sample_project("wh-1");

    {
        let store = SqliteTaskStore::new(file.path()).unwrap();
        store.save_project(&project).unwrap();
    }

    // Reopen to make sure the data hit the file
    let store = SqliteTaskStore::new(file.path()).unwrap();
    let loaded = store.load_project("wh-1").unwrap().expect("project stored");
    assert_eq!(loaded, project);

    let tasks = store.load_tasks("wh-1").unwrap();
    let critical = critical_path(&tasks).unwrap();
    assert!(critical.contains(&TaskId::from(2)));
    assert!(!critical.contains(&TaskId::from("roof")));
}

#[test]
fn saving_again_replaces_tasks() {
    let store = SqliteTaskStore::in_memory().unwrap();
    store.save_project(&sample_project("wh-1")).unwrap();

    let smaller = Project::new("wh-1", "Warehouse v2")
        .with_tasks(vec![Task::new(9, d(2025, 5, 1), d(2025, 5, 2))]);
    store.save_project(&smaller).unwrap();

    let loaded = store.load_project("wh-1").unwrap().unwrap();
    assert_eq!(loaded.name, "Warehouse v2");
    assert_eq!(loaded.tasks, smaller.tasks);
}

#[test]
fn lists_and_deletes_projects() {
    let store = SqliteTaskStore::in_memory().unwrap();
    store.save_project(&sample_project("b")).unwrap();
    store.save_project(&sample_project("a")).unwrap();

    assert_eq!(store.project_ids().unwrap(), vec!["a", "b"]);
    assert!(store.delete_project("a").unwrap());
    assert!(!store.delete_project("a").unwrap());
    assert_eq!(store.project_ids().unwrap(), vec!["b"]);
    assert!(store.load_project("a").unwrap().is_none());
}

#[test]
fn unknown_project_is_not_found() {
    let store = SqliteTaskStore::in_memory().unwrap();
    let err = store.load_tasks("nope").unwrap_err();
    assert!(matches!(err, PersistenceError::NotFound(ref id) if id == "nope"));
}

#[test]
fn duplicate_ids_are_not_stored() {
    let store = SqliteTaskStore::in_memory().unwrap();
    let project = Project::new("dup", "").with_tasks(vec![
        Task::new(1, d(2025, 4, 1), d(2025, 4, 2)),
        Task::new(1, d(2025, 4, 3), d(2025, 4, 4)),
    ]);

    let err = store.save_project(&project).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Analysis(CriticalPathError::DuplicateTaskId(_))
    ));
    assert!(store.project_ids().unwrap().is_empty());
}
