use crate::error::CriticalPathError;
use crate::task::{Task, TaskId};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Finish-to-start dependency graph over one task list.
///
/// Nodes carry task ids and are added in input order; an edge runs from each
/// dependency to its dependent. Dependencies naming ids outside the list are
/// dropped, repeated dependencies collapse into a single edge.
pub struct TaskDag {
    pub graph: DiGraph<TaskId, ()>,
    pub id_to_index: HashMap<TaskId, NodeIndex>,
    /// Inclusive day counts, indexed by `NodeIndex::index()`.
    durations: Vec<i64>,
}

impl TaskDag {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());
        let mut durations: Vec<i64> = Vec::with_capacity(tasks.len());

        // Add nodes first
        for task in tasks {
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.insert(task.id.clone(), node_ix);
            durations.push(task.duration_days());
        }

        // Add edges: dependency -> task
        let mut skipped = 0usize;
        for task in tasks {
            let Some(&v) = id_to_index.get(&task.id) else {
                continue;
            };
            for dep_id in &task.dependencies {
                match id_to_index.get(dep_id) {
                    Some(&u) => {
                        graph.update_edge(u, v, ());
                    }
                    None => {
                        skipped += 1;
                        debug!(task = %task.id, dependency = %dep_id, "ignoring unknown dependency");
                    }
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            skipped,
            "built task dependency graph"
        );

        Self {
            graph,
            id_to_index,
            durations,
        }
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn duration(&self, node_ix: NodeIndex) -> i64 {
        self.durations[node_ix.index()]
    }

    pub fn predecessors(&self, node_ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node_ix, Direction::Incoming)
    }

    pub fn successors(&self, node_ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node_ix, Direction::Outgoing)
    }

    /// Every task appears after all of its predecessors. A self-dependency or
    /// any longer cycle is reported with one of the tasks on it.
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>, CriticalPathError> {
        toposort(&self.graph, None).map_err(|cycle| CriticalPathError::CircularDependency {
            task_id: self.graph[cycle.node_id()].clone(),
        })
    }

    /// Successor ids of every task, sorted.
    pub fn successor_map(&self) -> HashMap<TaskId, Vec<TaskId>> {
        self.graph
            .node_indices()
            .map(|ix| {
                let mut succ: Vec<TaskId> =
                    self.successors(ix).map(|s| self.graph[s].clone()).collect();
                succ.sort();
                (self.graph[ix].clone(), succ)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn builds_edges_from_dependencies() {
        // 1 -> {2, 3}
        let tasks = vec![
            Task::new(1, d(1), d(2)),
            Task::new(2, d(3), d(4)).with_dependencies([1]),
            Task::new(3, d(3), d(3)).with_dependencies([1]),
        ];
        let dag = TaskDag::build(&tasks);
        assert_eq!(dag.graph.node_count(), 3);
        assert_eq!(dag.graph.edge_count(), 2);

        let succ = dag.successor_map();
        assert_eq!(succ[&TaskId::Number(1)], vec![TaskId::Number(2), TaskId::Number(3)]);
        assert!(succ[&TaskId::Number(2)].is_empty());
    }

    #[test]
    fn unknown_and_repeated_dependencies_are_collapsed() {
        let tasks = vec![
            Task::new(1, d(1), d(2)),
            Task::new(2, d(3), d(4)).with_dependencies([1, 1, 42]),
        ];
        let dag = TaskDag::build(&tasks);
        assert_eq!(dag.graph.edge_count(), 1);
    }

    #[test]
    fn topological_order_puts_dependencies_first() {
        let tasks = vec![
            Task::new("c", d(5), d(6)).with_dependencies(["b"]),
            Task::new("b", d(3), d(4)).with_dependencies(["a"]),
            Task::new("a", d(1), d(2)),
        ];
        let dag = TaskDag::build(&tasks);
        let order: Vec<TaskId> = dag
            .topological_order()
            .unwrap()
            .into_iter()
            .map(|ix| dag.graph[ix].clone())
            .collect();
        assert_eq!(
            order,
            vec![TaskId::from("a"), TaskId::from("b"), TaskId::from("c")]
        );
    }

    #[test]
    fn each_node_keeps_its_own_duration() {
        // Same id twice: the nodes must not share one duration entry
        let tasks = vec![
            Task::new(7, d(1), d(5)),
            Task::new(7, d(1), d(2)),
            Task::new("late", d(10), d(8)),
        ];
        let dag = TaskDag::build(&tasks);
        let durations: Vec<i64> = dag.graph.node_indices().map(|ix| dag.duration(ix)).collect();
        assert_eq!(durations, vec![5, 2, -1]);
    }

    #[test]
    fn cycle_is_reported() {
        let tasks = vec![
            Task::new(1, d(1), d(2)).with_dependencies([2]),
            Task::new(2, d(3), d(4)).with_dependencies([1]),
        ];
        let dag = TaskDag::build(&tasks);
        let err = dag.topological_order().unwrap_err();
        assert!(matches!(err, CriticalPathError::CircularDependency { .. }));
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let tasks = vec![Task::new(1, d(1), d(2)).with_dependencies([1])];
        let dag = TaskDag::build(&tasks);
        assert_eq!(
            dag.topological_order().unwrap_err(),
            CriticalPathError::CircularDependency {
                task_id: TaskId::Number(1)
            }
        );
    }
}
