use super::{PersistenceError, PersistenceResult, TaskSource};
use crate::project::Project;
use crate::task::Task;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Projects and their tasks in a local SQLite file, one JSON document per
/// task.
pub struct SqliteTaskStore {
    connection: Mutex<Connection>,
}

impl SqliteTaskStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                task_json TEXT NOT NULL,
                PRIMARY KEY (project_id, position)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection mutex poisoned".into()))
    }

    /// Replaces the stored project, keeping task order.
    pub fn save_project(&self, project: &Project) -> PersistenceResult<()> {
        super::validate_tasks(&project.tasks)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks WHERE project_id = ?1", params![project.id])?;
        tx.execute(
            "INSERT INTO projects (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![project.id, project.name],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (project_id, position, task_json) VALUES (?1, ?2, ?3)",
            )?;
            for (position, task) in project.tasks.iter().enumerate() {
                let json = serde_json::to_string(task)?;
                stmt.execute(params![project.id, position as i64, json])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_project(&self, project_id: &str) -> PersistenceResult<Option<Project>> {
        let conn = self.lock()?;

        let name: Option<String> = conn
            .query_row(
                "SELECT name FROM projects WHERE id = ?1",
                params![project_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare("SELECT task_json FROM tasks WHERE project_id = ?1 ORDER BY position ASC")?;
        let rows = stmt.query_map(params![project_id], |row| row.get::<_, String>(0))?;

        let mut tasks = Vec::new();
        for json in rows {
            let task: Task = serde_json::from_str(&json?)?;
            tasks.push(task);
        }
        super::validate_tasks(&tasks)?;

        Ok(Some(Project::new(project_id, name).with_tasks(tasks)))
    }

    pub fn project_ids(&self) -> PersistenceResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id FROM projects ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }
        Ok(ids)
    }

    /// Task rows go with the project through `ON DELETE CASCADE`.
    pub fn delete_project(&self, project_id: &str) -> PersistenceResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;
        Ok(removed > 0)
    }
}

impl TaskSource for SqliteTaskStore {
    fn load_tasks(&self, project_id: &str) -> PersistenceResult<Vec<Task>> {
        self.load_project(project_id)?
            .map(|project| project.tasks)
            .ok_or_else(|| PersistenceError::NotFound(project_id.to_string()))
    }
}
