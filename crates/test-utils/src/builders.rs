#![allow(dead_code)]

use shardflow::dag::{Task, TaskId, TaskIdentity, TaskType, WorkerPlacement};

/// Builder for [`Task`] to simplify test setup.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(job_id: u64, task_id: TaskId, task_type: TaskType) -> Self {
        Self {
            task: Task {
                job_id,
                task_id,
                task_type,
                query_string: String::new(),
                depended_tasks: vec![],
                placements: vec![],
                partition_id: 0,
                upstream_task_id: 0,
            },
        }
    }

    pub fn query(mut self, query_string: &str) -> Self {
        self.task.query_string = query_string.to_string();
        self
    }

    pub fn depends_on(mut self, job_id: u64, task_id: TaskId) -> Self {
        self.task
            .depended_tasks
            .push(TaskIdentity::new(job_id, task_id));
        self
    }

    pub fn placement(mut self, node_name: &str, node_port: u16) -> Self {
        self.task
            .placements
            .push(WorkerPlacement::new(node_name, node_port));
        self
    }

    pub fn partition_id(mut self, partition_id: u32) -> Self {
        self.task.partition_id = partition_id;
        self
    }

    pub fn upstream_task_id(mut self, upstream_task_id: TaskId) -> Self {
        self.task.upstream_task_id = upstream_task_id;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// An initial-partition task with one placement, the common leaf shape.
pub fn partition_task(job_id: u64, task_id: TaskId, node_name: &str, node_port: u16) -> Task {
    TaskBuilder::new(job_id, task_id, TaskType::InitialPartition)
        .query("SELECT worker_partition_shard(...)")
        .placement(node_name, node_port)
        .build()
}

/// An output-fetch task wired to its producing partition task. The query
/// string is left empty; the engine synthesizes it.
pub fn fetch_task(
    job_id: u64,
    task_id: TaskId,
    producer_task_id: TaskId,
    partition_id: u32,
    merge_task_id: TaskId,
) -> Task {
    TaskBuilder::new(job_id, task_id, TaskType::OutputFetch)
        .depends_on(job_id, producer_task_id)
        .partition_id(partition_id)
        .upstream_task_id(merge_task_id)
        .build()
}

/// A merge task depending on the given fetch tasks.
pub fn merge_task(job_id: u64, task_id: TaskId, fetch_task_ids: &[TaskId]) -> Task {
    let mut builder =
        TaskBuilder::new(job_id, task_id, TaskType::Merge).query("SELECT worker_merge_files(...)");
    for &fetch_id in fetch_task_ids {
        builder = builder.depends_on(job_id, fetch_id);
    }
    builder.build()
}
