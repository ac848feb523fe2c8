// tests/namespaces.rs

use std::error::Error;

use shardflow::config::EngineConfig;
use shardflow::dag::TaskSet;
use shardflow::engine::execute_dependent_tasks;
use shardflow::namespace::drop_all_job_namespaces;
use shardflow_test_utils::builders::merge_task;
use shardflow_test_utils::fakes::{RecordingCluster, RecordingExecutor, StaticSession};
use shardflow_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn create_commands_deduplicate_job_ids_in_first_seen_order() -> TestResult {
    init_tracing();

    // Merge tasks with job ids [5, 5, 7]: provisioning must create exactly
    // jobs 5 and 7, in that order, batched into one command string.
    let mut tasks = TaskSet::new(vec![
        merge_task(5, 1, &[]),
        merge_task(5, 2, &[]),
        merge_task(7, 1, &[]),
    ])
    .unwrap();

    let mut executor = RecordingExecutor::new();
    let mut cluster = RecordingCluster::two_workers();
    let session = StaticSession::clean();
    let config = EngineConfig::default();

    with_timeout(execute_dependent_tasks(
        &mut tasks,
        &[],
        &mut executor,
        &mut cluster,
        &session,
        &config,
    ))
    .await?;

    let batches = cluster.sent_batches();
    let create_batches: Vec<_> = batches
        .iter()
        .filter(|b| b.commands.iter().any(|c| c.contains("worker_create_job_namespace")))
        .collect();

    // One provisioning transaction per worker.
    assert_eq!(create_batches.len(), 2);
    for batch in &create_batches {
        assert_eq!(batch.commands.len(), 1);
        assert_eq!(
            batch.commands[0],
            "SELECT worker_create_job_namespace(5);SELECT worker_create_job_namespace(7);"
        );
        assert_eq!(batch.role, config.extension_owner);
    }

    Ok(())
}

#[tokio::test]
async fn reclamation_reuses_the_provisioned_job_ids() -> TestResult {
    init_tracing();

    let mut tasks = TaskSet::new(vec![merge_task(5, 1, &[]), merge_task(7, 1, &[])]).unwrap();

    let mut executor = RecordingExecutor::new();
    let mut cluster = RecordingCluster::two_workers();
    let session = StaticSession::clean();
    let config = EngineConfig::default();

    with_timeout(execute_dependent_tasks(
        &mut tasks,
        &[],
        &mut executor,
        &mut cluster,
        &session,
        &config,
    ))
    .await?;

    let batches = cluster.sent_batches();
    let delete_batches: Vec<_> = batches
        .iter()
        .filter(|b| b.commands.iter().any(|c| c.contains("worker_delete_job_directory")))
        .collect();

    assert_eq!(delete_batches.len(), 2);
    for batch in &delete_batches {
        assert_eq!(
            batch.commands[0],
            "SELECT worker_delete_job_directory(5);SELECT worker_delete_job_directory(7);"
        );
    }

    Ok(())
}

#[tokio::test]
async fn membership_is_consulted_fresh_for_each_broadcast() -> TestResult {
    init_tracing();

    let mut tasks = TaskSet::new(vec![merge_task(5, 1, &[])]).unwrap();

    let mut executor = RecordingExecutor::new();
    let mut cluster = RecordingCluster::two_workers();
    let session = StaticSession::clean();
    let config = EngineConfig::default();

    with_timeout(execute_dependent_tasks(
        &mut tasks,
        &[],
        &mut executor,
        &mut cluster,
        &session,
        &config,
    ))
    .await?;

    // One membership query for provisioning, one for reclamation.
    assert_eq!(cluster.membership_calls(), 2);

    Ok(())
}

#[tokio::test]
async fn global_sweep_is_idempotent() -> TestResult {
    init_tracing();

    let mut cluster = RecordingCluster::two_workers();
    let role = "shardflow";

    with_timeout(drop_all_job_namespaces(&mut cluster, role)).await?;
    // Nothing matching remains; the second sweep must still succeed.
    with_timeout(drop_all_job_namespaces(&mut cluster, role)).await?;

    let batches = cluster.sent_batches();
    assert_eq!(batches.len(), 4); // 2 sweeps x 2 workers
    for batch in &batches {
        assert_eq!(batch.commands.len(), 1);
        assert!(batch.commands[0].contains("worker_drop_job_namespaces"));
    }

    Ok(())
}

#[tokio::test]
async fn run_without_merge_tasks_provisions_nothing() -> TestResult {
    init_tracing();

    let mut tasks = TaskSet::new(vec![shardflow_test_utils::builders::partition_task(
        3, 1, "worker-a", 5432,
    )])
    .unwrap();

    let mut executor = RecordingExecutor::new();
    let mut cluster = RecordingCluster::two_workers();
    let session = StaticSession::clean();
    let config = EngineConfig::default();

    with_timeout(execute_dependent_tasks(
        &mut tasks,
        &[],
        &mut executor,
        &mut cluster,
        &session,
        &config,
    ))
    .await?;

    assert!(cluster.sent_batches().is_empty());
    assert_eq!(executor.waves().len(), 1);

    Ok(())
}
