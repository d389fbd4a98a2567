//! Critical path method over a dated task list.
//!
//! [`analyze`] runs the full computation and keeps every per-task quantity;
//! [`critical_path`] is the narrow entry point the chart layer uses when it
//! only needs to know which tasks to highlight.

use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::forward_pass::{ForwardPass, project_end};
use crate::config::AnalysisOptions;
use crate::error::CriticalPathError;
use crate::graph::TaskDag;
use crate::task::{Task, TaskId};
use crate::task_validation;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Scheduling quantities of one task, in days from the project start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTiming {
    pub duration_days: i64,
    pub early_start: i64,
    pub early_finish: i64,
    pub late_start: i64,
    pub late_finish: i64,
    pub slack: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// One task's timing in a serializable, flat shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRow {
    pub id: TaskId,
    #[serde(flatten)]
    pub timing: TaskTiming,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalPathAnalysis {
    pub timings: HashMap<TaskId, TaskTiming>,
    /// Length of the longest dependency chain, in days.
    pub project_duration: i64,
    /// Dependency edges (predecessor, successor) that survived graph
    /// construction, sorted.
    pub links: Vec<(TaskId, TaskId)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub project_duration: i64,
    pub critical_chain: Vec<TaskId>,
}

impl AnalysisSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}d", self.project_duration));
        if !self.critical_chain.is_empty() {
            let chain = self
                .critical_chain
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

impl CriticalPathAnalysis {
    pub fn timing(&self, task_id: &TaskId) -> Option<&TaskTiming> {
        self.timings.get(task_id)
    }

    pub fn slack(&self, task_id: &TaskId) -> Option<i64> {
        self.timings.get(task_id).map(|t| t.slack)
    }

    pub fn is_critical(&self, task_id: &TaskId) -> bool {
        self.timings
            .get(task_id)
            .is_some_and(TaskTiming::is_critical)
    }

    pub fn critical_tasks(&self) -> HashSet<TaskId> {
        self.timings
            .iter()
            .filter(|(_, timing)| timing.is_critical())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Critical tasks ordered by early start, ties broken by id.
    pub fn critical_chain(&self) -> Vec<TaskId> {
        let mut chain: Vec<(i64, &TaskId)> = self
            .timings
            .iter()
            .filter(|(_, timing)| timing.is_critical())
            .map(|(id, timing)| (timing.early_start, id))
            .collect();
        chain.sort();
        chain.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Dependency lines the chart draws as part of the critical path: both
    /// ends critical and no gap between them.
    pub fn critical_links(&self) -> Vec<(TaskId, TaskId)> {
        self.links
            .iter()
            .filter(|(pred, succ)| match (self.timings.get(pred), self.timings.get(succ)) {
                (Some(p), Some(s)) => {
                    p.is_critical() && s.is_critical() && p.early_finish == s.early_start
                }
                _ => false,
            })
            .cloned()
            .collect()
    }

    /// Timings ordered by early start, ties broken by id.
    pub fn rows(&self) -> Vec<TimingRow> {
        let mut rows: Vec<TimingRow> = self
            .timings
            .iter()
            .map(|(id, timing)| TimingRow {
                id: id.clone(),
                timing: *timing,
                is_critical: timing.is_critical(),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.timing
                .early_start
                .cmp(&b.timing.early_start)
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }

    pub fn summary(&self) -> AnalysisSummary {
        let critical_chain = self.critical_chain();
        AnalysisSummary {
            task_count: self.timings.len(),
            critical_count: critical_chain.len(),
            project_duration: self.project_duration,
            critical_chain,
        }
    }
}

/// Runs validation, graph construction and both passes. The input is only
/// read.
pub fn analyze(
    tasks: &[Task],
    options: &AnalysisOptions,
) -> Result<CriticalPathAnalysis, CriticalPathError> {
    task_validation::validate_task_collection(tasks, options)?;
    if tasks.is_empty() {
        return Ok(CriticalPathAnalysis::default());
    }

    let dag = TaskDag::build(tasks);
    let order = dag.topological_order()?;

    let early = ForwardPass::new(&dag).execute(&order);
    let project_duration = project_end(&early);
    let late = BackwardPass::new(&dag).execute(&order, project_duration);

    let mut timings = HashMap::with_capacity(dag.task_count());
    for &node_ix in &order {
        let (early_start, early_finish) = early[&node_ix];
        let (late_start, late_finish) = late[&node_ix];
        timings.insert(
            dag.graph[node_ix].clone(),
            TaskTiming {
                duration_days: dag.duration(node_ix),
                early_start,
                early_finish,
                late_start,
                late_finish,
                slack: late_start - early_start,
            },
        );
    }

    let mut links: Vec<(TaskId, TaskId)> = dag
        .graph
        .edge_indices()
        .filter_map(|edge| dag.graph.edge_endpoints(edge))
        .map(|(u, v)| (dag.graph[u].clone(), dag.graph[v].clone()))
        .collect();
    links.sort();

    Ok(CriticalPathAnalysis {
        timings,
        project_duration,
        links,
    })
}

/// Ids of every task with zero slack, using the default options.
pub fn critical_path(tasks: &[Task]) -> Result<HashSet<TaskId>, CriticalPathError> {
    critical_path_with_options(tasks, &AnalysisOptions::default())
}

pub fn critical_path_with_options(
    tasks: &[Task],
    options: &AnalysisOptions,
) -> Result<HashSet<TaskId>, CriticalPathError> {
    analyze(tasks, options).map(|analysis| analysis.critical_tasks())
}
