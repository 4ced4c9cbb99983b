//! Guarded entity service.
//!
//! [`EntityService`] serializes access to an [`EntityRepository`] behind a
//! single reader/writer gate: reads share it, writes hold it exclusively.
//! Every entity is validated before it reaches the repository, and every
//! call is bounded by a deadline.
//!
//! [`EntityRepository`]: pool_core::EntityRepository

mod config;
mod entity_service;
mod error;

pub use config::ServiceConfig;
pub use entity_service::EntityService;
pub use error::{ServiceError, ServiceResult};
