use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::{
    AnalysisOptions, AnalysisSummary, CriticalPathAnalysis, CriticalPathError, PersistenceError,
    Project, ProjectRegistry, Task, TaskId, TaskSource, TimingRow, analyze, analyze_portfolio,
    validate_tasks,
};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<RwLock<ProjectRegistry>>,
    options: AnalysisOptions,
}

impl AppState {
    pub fn new(registry: ProjectRegistry, options: AnalysisOptions) -> Self {
        Self::with_shared(Arc::new(RwLock::new(registry)), options)
    }

    /// State over a registry the caller keeps a handle to, e.g. to seed or
    /// inspect it while the router runs.
    pub fn with_shared(registry: Arc<RwLock<ProjectRegistry>>, options: AnalysisOptions) -> Self {
        Self { registry, options }
    }

    fn registry(&self) -> Arc<RwLock<ProjectRegistry>> {
        self.registry.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<CriticalPathError> for ApiError {
    fn from(value: CriticalPathError) -> Self {
        match value {
            CriticalPathError::DuplicateTaskId(_) => ApiError::Conflict(value.to_string()),
            _ => ApiError::Invalid(value.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::NotFound(id) => ApiError::not_found(format!("project {id} not found")),
            PersistenceError::Analysis(err) => ApiError::from(err),
            PersistenceError::InvalidData(message) => ApiError::Invalid(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        if status != StatusCode::NOT_FOUND {
            warn!(%status, %message, "request rejected");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Full analysis as sent over the wire; timings are a list because task
/// ids are not always strings.
#[derive(Debug, Serialize)]
pub struct AnalysisBody {
    pub project_duration: i64,
    pub critical: Vec<TaskId>,
    pub critical_links: Vec<(TaskId, TaskId)>,
    pub timings: Vec<TimingRow>,
    pub summary: AnalysisSummary,
}

impl From<&CriticalPathAnalysis> for AnalysisBody {
    fn from(analysis: &CriticalPathAnalysis) -> Self {
        Self {
            project_duration: analysis.project_duration,
            critical: sorted_critical(analysis),
            critical_links: analysis.critical_links(),
            timings: analysis.rows(),
            summary: analysis.summary(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectListing {
    id: String,
    name: String,
    task_count: usize,
}

#[derive(Debug, Serialize)]
struct PortfolioEntry {
    project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<AnalysisBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn sorted_critical(analysis: &CriticalPathAnalysis) -> Vec<TaskId> {
    let mut ids: Vec<TaskId> = analysis.critical_tasks().into_iter().collect();
    ids.sort();
    ids
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/critical-path", post(critical_path_for_tasks))
        .route("/analysis", post(analysis_for_tasks))
        .route("/projects", get(list_projects))
        .route("/projects/:id", delete(delete_project))
        .route(
            "/projects/:id/tasks",
            get(get_project_tasks).put(put_project_tasks),
        )
        .route("/projects/:id/critical-path", get(project_critical_path))
        .route("/projects/:id/analysis", get(project_analysis))
        .route("/portfolio/analysis", post(portfolio_analysis))
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    registry: ProjectRegistry,
    options: AnalysisOptions,
) -> std::io::Result<()> {
    let state = AppState::new(registry, options);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn critical_path_for_tasks(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let analysis = analyze(&tasks, &state.options)?;
    info!(tasks = tasks.len(), "critical path computed");
    Ok(Json(json!({ "critical": sorted_critical(&analysis) })))
}

async fn analysis_for_tasks(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<AnalysisBody>, ApiError> {
    let analysis = analyze(&tasks, &state.options)?;
    info!(tasks = tasks.len(), duration = analysis.project_duration, "analysis computed");
    Ok(Json(AnalysisBody::from(&analysis)))
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<ProjectListing>> {
    let registry = state.registry();
    let listing = {
        let guard = registry.read();
        guard
            .projects()
            .map(|p| ProjectListing {
                id: p.id.clone(),
                name: p.name.clone(),
                task_count: p.tasks.len(),
            })
            .collect()
    };
    Json(listing)
}

async fn get_project_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let registry = state.registry();
    let tasks = {
        let guard = registry.read();
        guard.load_tasks(&project_id)?
    };
    Ok(Json(tasks))
}

async fn put_project_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    validate_tasks(&tasks)?;
    let registry = state.registry();
    {
        let mut guard = registry.write();
        guard.set_tasks(&project_id, tasks.clone());
    }
    info!(project = %project_id, tasks = tasks.len(), "project tasks replaced");
    Ok(Json(tasks))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let registry = state.registry();
    let removed = {
        let mut guard = registry.write();
        guard.remove(&project_id)
    };
    if removed.is_none() {
        return Err(ApiError::not_found(format!("project {project_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn project_critical_path(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tasks = {
        let registry = state.registry();
        let guard = registry.read();
        guard.load_tasks(&project_id)?
    };
    let analysis = analyze(&tasks, &state.options)?;
    Ok(Json(json!({ "critical": sorted_critical(&analysis) })))
}

async fn project_analysis(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<AnalysisBody>, ApiError> {
    let tasks = {
        let registry = state.registry();
        let guard = registry.read();
        guard.load_tasks(&project_id)?
    };
    let analysis = analyze(&tasks, &state.options)?;
    Ok(Json(AnalysisBody::from(&analysis)))
}

async fn portfolio_analysis(
    State(state): State<AppState>,
) -> Result<Json<Vec<PortfolioEntry>>, ApiError> {
    let projects: Vec<Project> = {
        let registry = state.registry();
        let guard = registry.read();
        guard.projects().cloned().collect()
    };
    let options = state.options.clone();
    let results = spawn_blocking(move || analyze_portfolio(&projects, &options))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(projects = results.len(), "portfolio analysed");

    let entries = results
        .into_iter()
        .map(|entry| match entry.result {
            Ok(analysis) => PortfolioEntry {
                project_id: entry.project_id,
                analysis: Some(AnalysisBody::from(&analysis)),
                error: None,
            },
            Err(err) => PortfolioEntry {
                project_id: entry.project_id,
                analysis: None,
                error: Some(err.to_string()),
            },
        })
        .collect();
    Ok(Json(entries))
}
