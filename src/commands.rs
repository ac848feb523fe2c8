// src/commands.rs

//! Worker command synthesis.
//!
//! The exact command syntax is owned by the worker-side interpreter; this
//! module only guarantees that parameters are substituted in a fixed,
//! documented order. Per-job commands are concatenated into one batched
//! string so a single round trip per worker covers every job in the run.

use tracing::debug;

use crate::dag::{JobId, TaskIdentity, TaskSet, TaskType, WorkerPlacement};
use crate::errors::{Result, ShardflowError};

/// Prefix shared by every per-job namespace on the workers. The global
/// sweep drops all namespaces matching this prefix.
pub const JOB_NAMESPACE_PREFIX: &str = "repartition_job_";

/// Fetch command: producer job id, producer task id, partition id,
/// destination merge task id, source node name, source node port.
fn fetch_partition_file_command(
    job_id: JobId,
    producer_task_id: u32,
    partition_id: u32,
    merge_task_id: u32,
    source: &WorkerPlacement,
) -> String {
    format!(
        "SELECT worker_fetch_partition_file({job_id}, {producer_task_id}, {partition_id}, {merge_task_id}, '{}', {});",
        source.node_name, source.node_port
    )
}

fn create_job_namespace_command(job_id: JobId) -> String {
    format!("SELECT worker_create_job_namespace({job_id});")
}

fn delete_job_directory_command(job_id: JobId) -> String {
    format!("SELECT worker_delete_job_directory({job_id});")
}

/// One create-statement per distinct job id, concatenated in order.
pub fn create_job_namespaces_command(job_ids: &[JobId]) -> String {
    concatenated_job_commands(job_ids, create_job_namespace_command)
}

/// One delete-job-directory statement per distinct job id, concatenated in
/// order.
pub fn delete_job_directories_command(job_ids: &[JobId]) -> String {
    concatenated_job_commands(job_ids, delete_job_directory_command)
}

/// Drops every namespace matching [`JOB_NAMESPACE_PREFIX`] on a worker.
/// Idempotent: a worker with no matching namespaces treats this as a
/// no-op.
pub fn drop_all_job_namespaces_command() -> String {
    format!("SELECT worker_drop_job_namespaces('{JOB_NAMESPACE_PREFIX}');")
}

fn concatenated_job_commands(job_ids: &[JobId], render: impl Fn(JobId) -> String) -> String {
    let mut batched = String::new();
    for &job_id in job_ids {
        batched.push_str(&render(job_id));
    }
    batched
}

/// Synthesize and assign the query string of every output-fetch task.
///
/// Each fetch task must depend on exactly one producing initial-partition
/// task; anything else means the DAG builder produced a malformed graph.
/// The producer's *first* placement is used as the fetch source: by the
/// time a fetch is scheduled the executor has already required every
/// replica of the producer to succeed, so any replica is a valid source
/// and the first is chosen for determinism.
pub fn assign_fetch_query_strings(
    tasks: &mut TaskSet,
    fetch_tasks: &[TaskIdentity],
) -> Result<()> {
    for fetch_id in fetch_tasks {
        let command = {
            let fetch = tasks.get(fetch_id).ok_or_else(|| {
                ShardflowError::MalformedDag(format!("fetch task {fetch_id} not in task set"))
            })?;

            if fetch.task_type != TaskType::OutputFetch {
                return Err(ShardflowError::MalformedDag(format!(
                    "task {fetch_id} classified as fetch but has type {:?}",
                    fetch.task_type
                )));
            }

            let producer_id = match fetch.depended_tasks.as_slice() {
                [single] => *single,
                deps => {
                    return Err(ShardflowError::MalformedDag(format!(
                        "fetch task {fetch_id} must depend on exactly one producing task, found {}",
                        deps.len()
                    )));
                }
            };

            let producer = tasks.get(&producer_id).ok_or_else(|| {
                ShardflowError::MalformedDag(format!(
                    "fetch task {fetch_id} depends on {producer_id}, which is not in the task set"
                ))
            })?;

            if producer.task_type != TaskType::InitialPartition {
                return Err(ShardflowError::MalformedDag(format!(
                    "fetch task {fetch_id} depends on {producer_id} of type {:?}, expected an initial-partition task",
                    producer.task_type
                )));
            }

            let source = producer.placements.first().ok_or_else(|| {
                ShardflowError::MalformedDag(format!(
                    "producing task {producer_id} has no placements"
                ))
            })?;

            fetch_partition_file_command(
                producer.job_id,
                producer.task_id,
                fetch.partition_id,
                fetch.upstream_task_id,
                source,
            )
        };

        debug!(task = %fetch_id, %command, "assigned fetch query string");

        let fetch = tasks.get_mut(fetch_id).ok_or_else(|| {
            ShardflowError::MalformedDag(format!("fetch task {fetch_id} not in task set"))
        })?;
        fetch.query_string = command;
    }

    Ok(())
}
