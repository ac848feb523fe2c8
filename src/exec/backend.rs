// src/exec/backend.rs

//! Executor seam for dispatching task waves.
//!
//! The scheduler talks to a [`TaskExecutor`] instead of a concrete remote
//! executor. Production wires in the adaptive multi-task executor owned by
//! the surrounding system; tests provide a fake that records batches and
//! resolves them immediately.

use std::future::Future;
use std::pin::Pin;

use crate::dag::ScheduledTask;
use crate::errors::Result;

/// Row-modification mode the executor applies to a batch.
///
/// Repartition waves run read-side plumbing (partition, fetch, merge into
/// job-scoped namespaces) and always use [`RowModifyLevel::None`]; the
/// other modes exist for the non-repartition task paths that share the
/// executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowModifyLevel {
    None,
    ReadOnly,
    Commutative,
    NonCommutative,
}

/// Trait abstracting the external multi-task executor.
///
/// `execute_task_list` dispatches one wave: the implementation fans the
/// tasks out to worker connections in parallel, bounded by
/// `max_pool_size`, and returns only once every task in the batch has
/// either succeeded or the batch has failed as a whole. Any single task
/// failure (on any required replica) must surface as an error; the caller
/// treats it as fatal to the run.
pub trait TaskExecutor: Send {
    fn execute_task_list(
        &mut self,
        row_modify: RowModifyLevel,
        tasks: Vec<ScheduledTask>,
        max_pool_size: usize,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
