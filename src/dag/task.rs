// src/dag/task.rs

//! Task model for repartition execution.
//!
//! Tasks are constructed by the external planner / DAG expansion layer
//! before this crate runs. The execution core never creates or destroys
//! tasks; it only reads them, synthesizes query strings for output-fetch
//! tasks, and tracks completion in its own bookkeeping.

use std::fmt;

/// Identifies the overall distributed job owning a set of related tasks.
pub type JobId = u64;

/// Identifies a task within a job.
pub type TaskId = u32;

/// The `(job_id, task_id)` pair, unique per task within a run.
///
/// Used as the key for the completed set and for all dependency lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskIdentity {
    pub job_id: JobId,
    pub task_id: TaskId,
}

impl TaskIdentity {
    pub fn new(job_id: JobId, task_id: TaskId) -> Self {
        Self { job_id, task_id }
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.job_id, self.task_id)
    }
}

/// What kind of remote work a task performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Plain read task used by non-repartition paths.
    Select,
    /// Plain data-modifying task used by non-repartition paths.
    Modify,
    /// Partitions a shard's rows into per-partition intermediate files.
    InitialPartition,
    /// Copies one partition file from the worker that produced it to the
    /// worker that will merge it.
    OutputFetch,
    /// Combines fetched partition files into one result.
    Merge,
}

/// One candidate worker location for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPlacement {
    pub node_name: String,
    pub node_port: u16,
}

impl WorkerPlacement {
    pub fn new(node_name: impl Into<String>, node_port: u16) -> Self {
        Self {
            node_name: node_name.into(),
            node_port,
        }
    }
}

/// One unit of remote work bound to candidate worker placements.
///
/// `depended_tasks` references other members of the same task set by
/// identity; the referenced tasks must finish before this one may start.
/// `partition_id` and `upstream_task_id` are only meaningful for
/// output-fetch tasks: which partition file to move, and which merge task
/// is the destination.
#[derive(Debug, Clone)]
pub struct Task {
    pub job_id: JobId,
    pub task_id: TaskId,
    pub task_type: TaskType,
    pub query_string: String,
    pub depended_tasks: Vec<TaskIdentity>,
    pub placements: Vec<WorkerPlacement>,
    pub partition_id: u32,
    pub upstream_task_id: TaskId,
}

impl Task {
    pub fn identity(&self) -> TaskIdentity {
        TaskIdentity::new(self.job_id, self.task_id)
    }
}

/// Owned snapshot of a task handed to the executor seam for one wave.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub identity: TaskIdentity,
    pub task_type: TaskType,
    pub query_string: String,
    pub placements: Vec<WorkerPlacement>,
}

impl ScheduledTask {
    pub fn from_task(task: &Task) -> Self {
        Self {
            identity: task.identity(),
            task_type: task.task_type,
            query_string: task.query_string.clone(),
            placements: task.placements.clone(),
        }
    }
}
