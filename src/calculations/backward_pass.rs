use crate::graph::TaskDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

pub struct BackwardPass<'a> {
    dag: &'a TaskDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a TaskDag) -> Self {
        Self { dag }
    }

    /// Late start/finish day offsets keyed by node. `order` is the same
    /// topological order the forward pass used; it is walked in reverse.
    pub fn execute(
        &self,
        order: &[NodeIndex],
        project_end: i64,
    ) -> HashMap<NodeIndex, (i64, i64)> {
        let mut results: HashMap<NodeIndex, (i64, i64)> = HashMap::with_capacity(order.len());

        for &node_ix in order.iter().rev() {
            // Late finish is the earliest late start among successors
            let late_finish = self
                .dag
                .successors(node_ix)
                .filter_map(|succ_ix| results.get(&succ_ix).map(|&(ls, _)| ls))
                .min()
                .unwrap_or(project_end);
            let late_start = late_finish - self.dag.duration(node_ix);
            results.insert(node_ix, (late_start, late_finish));
        }

        results
    }
}
