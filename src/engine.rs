// src/engine.rs

//! Top-level orchestration of a repartition run.
//!
//! Phase order is load-bearing:
//! 1. session pre-flight guard (fail before any worker contact),
//! 2. structural validation of the expanded task graph,
//! 3. classification and fetch-command synthesis,
//! 4. namespace provisioning on every worker,
//! 5. wave-by-wave draining of the graph,
//! 6. reclamation of temporary job directories.
//!
//! Reclamation is only reached on success; a failed run leaves its
//! namespaces for the out-of-band sweep
//! ([`crate::namespace::drop_all_job_namespaces`]).

use tracing::{debug, info};

use crate::commands::assign_fetch_query_strings;
use crate::config::EngineConfig;
use crate::dag::{
    TaskIdentity, TaskSet, classify_tasks, execute_in_dependency_order, validate_task_graph,
};
use crate::errors::{Result, ShardflowError};
use crate::exec::{ClusterBackend, SessionGuard, TaskExecutor};
use crate::namespace::{create_job_namespaces, distinct_job_ids, remove_job_directories};

/// Execute every task reachable from the top-level tasks, in dependency
/// order, except the top-level tasks themselves.
///
/// `top_level` identifies the tasks owned by the calling layer (the final
/// step of the outer query); they are treated as already satisfied and are
/// never dispatched here. `tasks` is the fully expanded task collection
/// from the DAG-expansion collaborator; fetch tasks' query strings are
/// synthesized in place before scheduling begins.
pub async fn execute_dependent_tasks<E, C, S>(
    tasks: &mut TaskSet,
    top_level: &[TaskIdentity],
    executor: &mut E,
    cluster: &mut C,
    session: &S,
    config: &EngineConfig,
) -> Result<()>
where
    E: TaskExecutor,
    C: ClusterBackend,
    S: SessionGuard + Sync,
{
    // Repartition waves never see modifications made earlier in the
    // enclosing transaction, so refuse to start if any happened.
    if session.modifications_have_been_done() {
        return Err(ShardflowError::PriorModification);
    }

    config.validate()?;
    validate_task_graph(tasks)?;

    info!(
        tasks = tasks.len(),
        top_level = top_level.len(),
        "starting repartition run"
    );

    let groups = classify_tasks(tasks);
    assign_fetch_query_strings(tasks, &groups.fetch_tasks)?;

    let job_ids = distinct_job_ids(&groups.merge_tasks);
    create_job_namespaces(cluster, &config.extension_owner, &job_ids).await?;

    execute_in_dependency_order(tasks, top_level, executor, config.max_task_pool_size).await?;

    remove_job_directories(cluster, &config.extension_owner, &job_ids).await?;

    debug!(?job_ids, "repartition run finished");
    Ok(())
}
