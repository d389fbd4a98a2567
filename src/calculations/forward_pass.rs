use crate::graph::TaskDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

pub struct ForwardPass<'a> {
    dag: &'a TaskDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a TaskDag) -> Self {
        Self { dag }
    }

    /// Early start/finish day offsets keyed by node. `order` must be
    /// topological.
    pub fn execute(&self, order: &[NodeIndex]) -> HashMap<NodeIndex, (i64, i64)> {
        let mut results: HashMap<NodeIndex, (i64, i64)> = HashMap::with_capacity(order.len());

        for &node_ix in order {
            // Early start is max of all predecessor finishes
            let early_start = self
                .dag
                .predecessors(node_ix)
                .filter_map(|pred_ix| results.get(&pred_ix).map(|&(_, ef)| ef))
                .max()
                .unwrap_or(0);
            let early_finish = early_start + self.dag.duration(node_ix);
            results.insert(node_ix, (early_start, early_finish));
        }

        results
    }
}

/// Latest early finish across all tasks, 0 when there are none.
pub fn project_end(early: &HashMap<NodeIndex, (i64, i64)>) -> i64 {
    early.values().map(|&(_, ef)| ef).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskId};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn forward_pass_computes_early_offsets_across_dag() {
        // 1(2d) -> {2(3d), 3(1d)} -> 4(2d)
        let tasks = vec![
            Task::new(1, d(6), d(7)),
            Task::new(2, d(8), d(10)).with_dependencies([1]),
            Task::new(3, d(8), d(8)).with_dependencies([1]),
            Task::new(4, d(11), d(12)).with_dependencies([2, 3]),
        ];
        let dag = TaskDag::build(&tasks);
        let order = dag.topological_order().unwrap();
        let early = ForwardPass::new(&dag).execute(&order);

        let at = |id: i64| early[&dag.id_to_index[&TaskId::from(id)]];
        assert_eq!(at(1), (0, 2));
        assert_eq!(at(2), (2, 5));
        assert_eq!(at(3), (2, 3));
        assert_eq!(at(4), (5, 7));
        assert_eq!(project_end(&early), 7);
    }

    #[test]
    fn empty_graph_ends_at_zero() {
        let dag = TaskDag::build(&[]);
        let early = ForwardPass::new(&dag).execute(&[]);
        assert!(early.is_empty());
        assert_eq!(project_end(&early), 0);
    }
}
