// src/exec/cluster.rs

//! Cluster seam: worker membership and per-worker command transactions.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::errors::Result;

/// One active worker node, as reported by the membership query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerNode {
    pub name: String,
    pub port: u16,
}

impl WorkerNode {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// Trait abstracting cluster membership and the transaction/command layer.
///
/// `send_commands_in_transaction` must be atomic per worker: either every
/// command in the list applies on that worker, or none do. There is no
/// cross-worker atomicity; the caller aborts the run on the first failed
/// worker instead. `role` is the execution identity the commands run as,
/// threaded explicitly rather than held as ambient state, so namespace
/// objects are always owned consistently regardless of who issued the
/// enclosing query.
pub trait ClusterBackend: Send {
    /// List the currently active, readable worker nodes. Consulted fresh
    /// before every broadcast so membership changes between phases are
    /// picked up.
    fn active_readable_workers(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<WorkerNode>>> + Send + '_>>;

    /// Send a command list to one worker in a single transaction, as `role`.
    fn send_commands_in_transaction(
        &mut self,
        node: WorkerNode,
        role: &str,
        commands: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Send the same command list to every active readable worker, one
/// transaction per worker.
///
/// The first worker failure propagates and aborts the caller's run; a
/// partially provisioned cluster would otherwise fail later merge tasks
/// with a confusing secondary error.
pub async fn send_commands_to_all_workers<C: ClusterBackend>(
    cluster: &mut C,
    role: &str,
    commands: Vec<String>,
) -> Result<()> {
    let workers = cluster.active_readable_workers().await?;

    debug!(
        workers = workers.len(),
        commands = commands.len(),
        %role,
        "broadcasting command list to all workers"
    );

    for node in workers {
        cluster
            .send_commands_in_transaction(node, role, commands.clone())
            .await?;
    }

    Ok(())
}
