//! Actor system for the worker pool.
//!
//! This crate provides the Ractor-based worker pool: a bounded job queue
//! drained by a fixed group of workers, with results published to a
//! bounded result queue that closes once the last worker has exited.
//!
//! # Architecture
//!
//! - `WorkerPool` - Facade for submitting jobs and consuming results
//! - `PoolSupervisor` - Spawns the workers and closes the result queue
//!   after every one of them has terminated
//! - `WorkerActor` - Pulls jobs, runs the handler, publishes results
//!
//! # Usage
//!
//! ```ignore
//! use actors::{Doubling, WorkerPool};
//! use pool_core::PoolConfig;
//!
//! let (results, summary) =
//!     WorkerPool::run(PoolConfig::default(), Arc::new(Doubling), 1..=10).await?;
//! ```

mod handler;
mod messages;
mod pool;
mod queue;
mod supervisor;
mod worker_actor;

pub use handler::{Doubling, FnHandler, HandlerFuture, HandlerResult, JobHandler};
pub use messages::{SupervisorMessage, WorkerMessage};
pub use pool::{PoolError, WorkerPool};
pub use queue::{BoundedQueue, QueueClosed};
pub use supervisor::{PoolCounters, PoolSupervisor};
pub use worker_actor::WorkerActor;

#[doc(hidden)]
pub use pool_core;

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort};
