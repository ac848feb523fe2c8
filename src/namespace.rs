// src/namespace.rs

//! Per-job namespace provisioning and reclamation.
//!
//! Each job's intermediate artifacts live under a job-id-scoped namespace
//! on every worker, created before any task touches it and removed after
//! the run. That scoping is what isolates concurrently running jobs that
//! share worker nodes.

use tracing::{debug, info};

use crate::commands::{
    create_job_namespaces_command, delete_job_directories_command,
    drop_all_job_namespaces_command,
};
use crate::dag::{JobId, TaskIdentity};
use crate::errors::Result;
use crate::exec::{ClusterBackend, send_commands_to_all_workers};

/// Distinct job ids among the merge tasks, in first-seen order.
///
/// Deduplication is a linear membership scan; the number of distinct jobs
/// per run is small, typically one.
pub fn distinct_job_ids(merge_tasks: &[TaskIdentity]) -> Vec<JobId> {
    let mut job_ids: Vec<JobId> = Vec::new();

    for identity in merge_tasks {
        if !job_ids.contains(&identity.job_id) {
            job_ids.push(identity.job_id);
        }
    }

    job_ids
}

/// Create the per-job namespaces on every active readable worker, one
/// batched command per worker inside one transaction per worker.
///
/// Any worker failure propagates and aborts the run: partially provisioned
/// workers would later fail merge tasks with a confusing secondary error.
pub async fn create_job_namespaces<C: ClusterBackend>(
    cluster: &mut C,
    role: &str,
    job_ids: &[JobId],
) -> Result<()> {
    if job_ids.is_empty() {
        debug!("no merge tasks in run; skipping namespace provisioning");
        return Ok(());
    }

    info!(?job_ids, "creating job namespaces on all workers");
    let batched = create_job_namespaces_command(job_ids);
    send_commands_to_all_workers(cluster, role, vec![batched]).await
}

/// Remove the temporary on-disk job directories for the given job ids on
/// every worker. Runs only after a clean drain, from the same job-id
/// collection the provisioner computed.
pub async fn remove_job_directories<C: ClusterBackend>(
    cluster: &mut C,
    role: &str,
    job_ids: &[JobId],
) -> Result<()> {
    if job_ids.is_empty() {
        return Ok(());
    }

    info!(?job_ids, "removing temporary job directories on all workers");
    let batched = delete_job_directories_command(job_ids);
    send_commands_to_all_workers(cluster, role, vec![batched]).await
}

/// Drop every job namespace matching the fixed prefix on every worker.
///
/// Out-of-band cleanup for after crashes; not part of the per-run happy
/// path. Safe to invoke repeatedly; a sweep with nothing left to drop
/// succeeds.
pub async fn drop_all_job_namespaces<C: ClusterBackend>(cluster: &mut C, role: &str) -> Result<()> {
    info!("sweeping job namespaces on all workers");
    send_commands_to_all_workers(cluster, role, vec![drop_all_job_namespaces_command()]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_ids(job_ids: &[u64]) -> Vec<TaskIdentity> {
        job_ids
            .iter()
            .enumerate()
            .map(|(pos, &job_id)| TaskIdentity::new(job_id, pos as u32 + 1))
            .collect()
    }

    #[test]
    fn job_ids_deduplicated_in_first_seen_order() {
        let merges = merge_ids(&[5, 5, 7]);
        assert_eq!(distinct_job_ids(&merges), vec![5, 7]);
    }

    #[test]
    fn no_merge_tasks_means_no_job_ids() {
        assert!(distinct_job_ids(&[]).is_empty());
    }
}
