// src/dag/graph.rs

//! Structural validation of the expanded task graph.
//!
//! The planner and the DAG expansion collaborator are supposed to hand us
//! an internally consistent, acyclic graph. A graph that violates that is
//! a programming-error-level fault upstream, and scheduling it would either
//! dispatch tasks against missing producers or stall forever. Validation
//! runs before any worker is contacted.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::task::TaskIdentity;
use crate::dag::task_set::TaskSet;
use crate::errors::{Result, ShardflowError};

/// Check that every dependency reference resolves within the task set and
/// that the dependency edges form a DAG.
pub fn validate_task_graph(tasks: &TaskSet) -> Result<()> {
    // Edge direction: dependency -> dependent, matching execution order.
    let mut graph: DiGraphMap<TaskIdentity, ()> = DiGraphMap::new();

    for task in tasks.iter() {
        graph.add_node(task.identity());
    }

    for task in tasks.iter() {
        for dep in &task.depended_tasks {
            if !tasks.contains(dep) {
                return Err(ShardflowError::MalformedDag(format!(
                    "task {} depends on {}, which is not in the task set",
                    task.identity(),
                    dep
                )));
            }
            if *dep == task.identity() {
                return Err(ShardflowError::MalformedDag(format!(
                    "task {} depends on itself",
                    task.identity()
                )));
            }
            graph.add_edge(*dep, task.identity(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(ShardflowError::MalformedDag(format!(
            "cycle detected in task graph involving task {}",
            cycle.node_id()
        ))),
    }
}
