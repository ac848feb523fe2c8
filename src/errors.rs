// src/errors.rs

//! Crate-wide error taxonomy and helpers.
//!
//! A repartition run either completes every wave and reclaims its job
//! directories, or it fails with one of the variants below. There is no
//! partial-success continuation and no retry at this layer; retry policy,
//! if any, belongs to the delegated executor.

use thiserror::Error;

use crate::dag::TaskIdentity;

#[derive(Error, Debug)]
pub enum ShardflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A data-modifying statement already ran earlier in the enclosing
    /// transaction. Repartition waves do not propagate that transaction
    /// context to workers, so they could never see those modifications;
    /// the run must fail before any worker is contacted.
    #[error(
        "cannot run repartition tasks: modifications were already made in the current transaction"
    )]
    PriorModification,

    /// The expanded task graph violates a structural invariant: a dangling
    /// dependency reference, a cycle, a duplicate task identity, or a task
    /// whose type is inconsistent with its position in the graph.
    #[error("Malformed task graph: {0}")]
    MalformedDag(String),

    /// The wave loop drained without every task reaching the completed set.
    /// An empty frontier alone cannot distinguish legitimate completion
    /// from a stuck graph, so the scheduler checks explicitly.
    #[error(
        "Task graph did not drain: {missing} of {total} tasks never became ready, first: {first:?}"
    )]
    IncompleteDag {
        missing: usize,
        total: usize,
        first: TaskIdentity,
    },

    /// A task in a dispatched wave failed on a worker. Fatal to the run.
    #[error("Task execution failed: {0}")]
    Execution(String),

    /// A worker rejected a namespace or cleanup command batch.
    #[error("Worker command broadcast failed: {0}")]
    Broadcast(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ShardflowError>;
