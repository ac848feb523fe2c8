// src/dag/classify.rs

//! Typed grouping of the flat task list.

use tracing::debug;

use crate::dag::task::{TaskIdentity, TaskType};
use crate::dag::task_set::TaskSet;

/// The typed task subsets the repartition phases care about, in the task
/// set's original relative order.
#[derive(Debug, Default)]
pub struct TaskGroups {
    pub fetch_tasks: Vec<TaskIdentity>,
    pub merge_tasks: Vec<TaskIdentity>,
}

/// Partition the task set into output-fetch and merge subsets with one
/// linear scan over `task_type`. Empty subsets are valid; a run without an
/// intermediate fetch step simply yields empty groups.
pub fn classify_tasks(tasks: &TaskSet) -> TaskGroups {
    let mut groups = TaskGroups::default();

    for task in tasks.iter() {
        match task.task_type {
            TaskType::OutputFetch => groups.fetch_tasks.push(task.identity()),
            TaskType::Merge => groups.merge_tasks.push(task.identity()),
            _ => {}
        }
    }

    debug!(
        fetch_tasks = groups.fetch_tasks.len(),
        merge_tasks = groups.merge_tasks.len(),
        total = tasks.len(),
        "classified task groups"
    );

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::task::Task;

    fn task(task_id: u32, task_type: TaskType) -> Task {
        Task {
            job_id: 7,
            task_id,
            task_type,
            query_string: String::new(),
            depended_tasks: vec![],
            placements: vec![],
            partition_id: 0,
            upstream_task_id: 0,
        }
    }

    #[test]
    fn groups_preserve_relative_order() {
        let set = TaskSet::new(vec![
            task(1, TaskType::InitialPartition),
            task(2, TaskType::Merge),
            task(3, TaskType::OutputFetch),
            task(4, TaskType::Merge),
            task(5, TaskType::OutputFetch),
        ])
        .unwrap();

        let groups = classify_tasks(&set);
        let fetch_ids: Vec<u32> = groups.fetch_tasks.iter().map(|i| i.task_id).collect();
        let merge_ids: Vec<u32> = groups.merge_tasks.iter().map(|i| i.task_id).collect();

        assert_eq!(fetch_ids, vec![3, 5]);
        assert_eq!(merge_ids, vec![2, 4]);
    }

    #[test]
    fn run_without_fetch_step_yields_empty_groups() {
        let set = TaskSet::new(vec![task(1, TaskType::Select)]).unwrap();
        let groups = classify_tasks(&set);
        assert!(groups.fetch_tasks.is_empty());
        assert!(groups.merge_tasks.is_empty());
    }
}
