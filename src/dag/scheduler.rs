// src/dag/scheduler.rs

//! Dependency-ordered wave execution.
//!
//! The scheduler drains the task graph wave by wave: each wave is the set
//! of tasks whose dependencies have all completed and which have not run
//! yet. A wave is a synchronization barrier: no task in wave N+1 starts
//! until every task in wave N has durably completed, because downstream
//! reads of intermediate partition files require the producer to have
//! fully finished, not just "not yet failed".
//!
//! The frontier is recomputed from scratch each wave rather than kept
//! incrementally with dependency reference counts. DAG depth is a handful
//! of waves in practice, so per-wave task counts dominate total work and
//! the repeated scan stays cheap.

use tracing::{debug, info};

use crate::dag::completed::CompletedTasks;
use crate::dag::task::{ScheduledTask, TaskIdentity};
use crate::dag::task_set::TaskSet;
use crate::errors::{Result, ShardflowError};
use crate::exec::{RowModifyLevel, TaskExecutor};

/// Execute every non-top-level task in dependency order.
///
/// Top-level tasks are owned and executed by the calling layer (they form
/// the final step of the outer query), so their identities are pre-seeded
/// into the completed set: they are never dispatched here, only treated as
/// already-satisfied prerequisites for anything depending on them.
///
/// On a clean drain, every task identity must have reached the completed
/// set; anything left over means the graph was stuck, which surfaces as
/// [`ShardflowError::IncompleteDag`] instead of silent under-execution.
pub async fn execute_in_dependency_order<E: TaskExecutor>(
    tasks: &TaskSet,
    top_level: &[TaskIdentity],
    executor: &mut E,
    max_pool_size: usize,
) -> Result<()> {
    let mut completed = CompletedTasks::new();
    completed.extend(top_level.iter().copied());

    let mut wave = 0u32;
    loop {
        let frontier = ready_frontier(tasks, &completed);
        if frontier.is_empty() {
            break;
        }

        wave += 1;
        info!(
            wave,
            batch = frontier.len(),
            completed = completed.len(),
            "dispatching ready task wave"
        );

        let batch: Vec<ScheduledTask> = frontier
            .iter()
            .filter_map(|identity| tasks.get(identity))
            .map(ScheduledTask::from_task)
            .collect();

        executor
            .execute_task_list(RowModifyLevel::None, batch, max_pool_size)
            .await?;

        completed.extend(frontier);
    }

    verify_all_completed(tasks, &completed)?;

    info!(waves = wave, tasks = tasks.len(), "task graph drained");
    Ok(())
}

/// Tasks whose dependencies are all completed and which have not run yet,
/// in task-set scan order. Scan order does not affect correctness, only
/// determinism of logs and tests.
fn ready_frontier(tasks: &TaskSet, completed: &CompletedTasks) -> Vec<TaskIdentity> {
    tasks
        .iter()
        .filter(|task| {
            !completed.contains(&task.identity())
                && task
                    .depended_tasks
                    .iter()
                    .all(|dep| completed.contains(dep))
        })
        .map(|task| task.identity())
        .collect()
}

/// An empty frontier alone cannot distinguish "all tasks completed" from
/// "some tasks were permanently unready"; check explicitly.
fn verify_all_completed(tasks: &TaskSet, completed: &CompletedTasks) -> Result<()> {
    let missing: Vec<TaskIdentity> = tasks
        .identities()
        .filter(|identity| !completed.contains(identity))
        .collect();

    if let Some(first) = missing.first() {
        debug!(?missing, "tasks never became ready");
        return Err(ShardflowError::IncompleteDag {
            missing: missing.len(),
            total: tasks.len(),
            first: *first,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::task::{Task, TaskType};

    fn task(task_id: u32, deps: Vec<TaskIdentity>) -> Task {
        Task {
            job_id: 1,
            task_id,
            task_type: TaskType::InitialPartition,
            query_string: String::new(),
            depended_tasks: deps,
            placements: vec![],
            partition_id: 0,
            upstream_task_id: 0,
        }
    }

    fn id(task_id: u32) -> TaskIdentity {
        TaskIdentity::new(1, task_id)
    }

    #[test]
    fn frontier_is_leaves_first() {
        let set = TaskSet::new(vec![
            task(1, vec![]),
            task(2, vec![]),
            task(3, vec![id(1), id(2)]),
        ])
        .unwrap();

        let completed = CompletedTasks::new();
        assert_eq!(ready_frontier(&set, &completed), vec![id(1), id(2)]);
    }

    #[test]
    fn frontier_excludes_completed_and_blocked() {
        let set = TaskSet::new(vec![
            task(1, vec![]),
            task(2, vec![id(1)]),
            task(3, vec![id(2)]),
        ])
        .unwrap();

        let mut completed = CompletedTasks::new();
        completed.insert(id(1));
        assert_eq!(ready_frontier(&set, &completed), vec![id(2)]);
    }

    #[test]
    fn verify_reports_first_missing_identity() {
        let set = TaskSet::new(vec![task(1, vec![]), task(2, vec![])]).unwrap();
        let mut completed = CompletedTasks::new();
        completed.insert(id(1));

        let err = verify_all_completed(&set, &completed).unwrap_err();
        match err {
            ShardflowError::IncompleteDag {
                missing,
                total,
                first,
            } => {
                assert_eq!(missing, 1);
                assert_eq!(total, 2);
                assert_eq!(first, id(2));
            }
            other => panic!("expected IncompleteDag, got {other:?}"),
        }
    }
}
