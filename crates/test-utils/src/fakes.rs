use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use shardflow::dag::{ScheduledTask, TaskIdentity};
use shardflow::errors::{Result, ShardflowError};
use shardflow::exec::{ClusterBackend, RowModifyLevel, SessionGuard, TaskExecutor, WorkerNode};

/// A fake executor that:
/// - records each dispatched wave as a list of task identities
/// - succeeds immediately, unless programmed to fail when a given task
///   appears in a wave.
pub struct RecordingExecutor {
    waves: Arc<Mutex<Vec<Vec<TaskIdentity>>>>,
    fail_on: Option<TaskIdentity>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            waves: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    /// Fail the batch containing the given task, as the real executor does
    /// when any task in a wave fails.
    pub fn fail_on(mut self, identity: TaskIdentity) -> Self {
        self.fail_on = Some(identity);
        self
    }

    /// Waves dispatched so far, in order.
    pub fn waves(&self) -> Vec<Vec<TaskIdentity>> {
        self.waves.lock().unwrap().clone()
    }

    /// Every dispatched task identity, flattened in dispatch order.
    pub fn dispatched(&self) -> Vec<TaskIdentity> {
        self.waves().into_iter().flatten().collect()
    }
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskExecutor for RecordingExecutor {
    fn execute_task_list(
        &mut self,
        _row_modify: RowModifyLevel,
        tasks: Vec<ScheduledTask>,
        _max_pool_size: usize,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let waves = Arc::clone(&self.waves);
        let fail_on = self.fail_on;

        Box::pin(async move {
            let identities: Vec<TaskIdentity> = tasks.iter().map(|t| t.identity).collect();
            waves.lock().unwrap().push(identities.clone());

            if let Some(failing) = fail_on {
                if identities.contains(&failing) {
                    return Err(ShardflowError::Execution(format!(
                        "task {failing} failed on worker"
                    )));
                }
            }
            Ok(())
        })
    }
}

/// One command batch sent to one worker.
#[derive(Debug, Clone)]
pub struct SentBatch {
    pub node: WorkerNode,
    pub role: String,
    pub commands: Vec<String>,
}

/// A fake cluster backend that:
/// - serves a fixed worker list from the membership query
/// - records every per-worker command batch
/// - succeeds, unless programmed to reject commands on a given node.
pub struct RecordingCluster {
    workers: Vec<WorkerNode>,
    membership_calls: Arc<Mutex<usize>>,
    sent: Arc<Mutex<Vec<SentBatch>>>,
    fail_on_node: Option<String>,
}

impl RecordingCluster {
    pub fn new(workers: Vec<WorkerNode>) -> Self {
        Self {
            workers,
            membership_calls: Arc::new(Mutex::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_on_node: None,
        }
    }

    pub fn two_workers() -> Self {
        Self::new(vec![
            WorkerNode::new("worker-a", 5432),
            WorkerNode::new("worker-b", 5432),
        ])
    }

    /// Reject any command batch sent to the named node.
    pub fn fail_on_node(mut self, node_name: &str) -> Self {
        self.fail_on_node = Some(node_name.to_string());
        self
    }

    pub fn membership_calls(&self) -> usize {
        *self.membership_calls.lock().unwrap()
    }

    pub fn sent_batches(&self) -> Vec<SentBatch> {
        self.sent.lock().unwrap().clone()
    }
}

impl ClusterBackend for RecordingCluster {
    fn active_readable_workers(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<WorkerNode>>> + Send + '_>> {
        let workers = self.workers.clone();
        let calls = Arc::clone(&self.membership_calls);

        Box::pin(async move {
            *calls.lock().unwrap() += 1;
            Ok(workers)
        })
    }

    fn send_commands_in_transaction(
        &mut self,
        node: WorkerNode,
        role: &str,
        commands: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let sent = Arc::clone(&self.sent);
        let fail_on_node = self.fail_on_node.clone();
        let role = role.to_string();

        Box::pin(async move {
            if fail_on_node.as_deref() == Some(node.name.as_str()) {
                return Err(ShardflowError::Broadcast(format!(
                    "worker {}:{} rejected command batch",
                    node.name, node.port
                )));
            }

            sent.lock().unwrap().push(SentBatch {
                node,
                role,
                commands,
            });
            Ok(())
        })
    }
}

/// A session guard with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticSession {
    modified: bool,
}

impl StaticSession {
    pub fn clean() -> Self {
        Self { modified: false }
    }

    pub fn with_prior_modifications() -> Self {
        Self { modified: true }
    }
}

impl SessionGuard for StaticSession {
    fn modifications_have_been_done(&self) -> bool {
        self.modified
    }
}
