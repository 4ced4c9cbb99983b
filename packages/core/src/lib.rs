//! Core domain types for the worker pool and entity service.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobResult and JobOutcome for pool work items
//! - PoolConfig, PoolStatus and PoolSummary for pool runs
//! - Entity and its validation rules
//! - The EntityRepository storage contract
//! - Events for observing a running pool

mod entity;
mod error;
mod events;
mod job;
mod pool;
mod repository;
pub mod transform;

pub use entity::{Address, Entity, EntityId, EntityStatus, RESOURCE as ENTITY_RESOURCE, validate};
pub use error::{RepositoryError, RepositoryResult, ValidationError};
pub use events::PoolEvent;
pub use job::{Job, JobId, JobOutcome, JobResult};
pub use pool::{PoolConfig, PoolStatus, PoolSummary};
pub use repository::EntityRepository;

#[cfg(any(test, feature = "testing"))]
pub use repository::MockEntityRepository;
