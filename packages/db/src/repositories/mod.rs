//! Repository implementations of the entity storage contract.

mod entity_repo;
mod memory;

pub use entity_repo::SurrealEntityRepository;
pub use memory::InMemoryEntityRepository;
