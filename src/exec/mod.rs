// src/exec/mod.rs

//! Seams to the external execution machinery.
//!
//! This crate decides the order and grouping of work; everything that
//! touches a connection lives behind these traits:
//!
//! - [`backend`] provides [`TaskExecutor`], the multi-task executor that
//!   fans a wave out to workers under a concurrency bound.
//! - [`cluster`] provides [`ClusterBackend`] (membership + per-worker
//!   single-transaction command sends) and the all-workers broadcast
//!   helper.
//! - [`session`] provides [`SessionGuard`], the pre-flight check on the
//!   enclosing transaction.
//!
//! Tests replace all three with recording fakes.

pub mod backend;
pub mod cluster;
pub mod session;

pub use backend::{RowModifyLevel, TaskExecutor};
pub use cluster::{ClusterBackend, WorkerNode, send_commands_to_all_workers};
pub use session::{NoPriorModifications, SessionGuard};
