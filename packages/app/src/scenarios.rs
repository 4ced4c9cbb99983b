//! The two demonstration runs: the worker pool and the entity service.

use std::error::Error;
use std::sync::Arc;

use actors::{Doubling, WorkerPool};
use db::{DbConfig, InMemoryEntityRepository, SurrealEntityRepository};
use pool_core::{Address, EntityRepository, EntityStatus, transform};
use service::{EntityService, ServiceError};

use crate::config::{AppConfig, StoreKind};

/// Double `1..=jobs` through the pool and report what came back.
pub async fn run_pool(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        workers = config.pool.workers,
        jobs = config.jobs,
        "Running worker pool scenario"
    );

    let (results, summary) =
        WorkerPool::run(config.pool.clone(), Arc::new(Doubling), 1..=config.jobs).await?;

    for result in &results {
        match result.value() {
            Some(value) => tracing::info!(
                job_id = %result.job_id,
                worker_id = %result.worker_id,
                "Result: {} -> {}",
                result.source,
                value
            ),
            None => tracing::warn!(
                job_id = %result.job_id,
                "Job failed: {}",
                result.error().unwrap_or("unknown error")
            ),
        }
    }

    let values: Vec<i64> = results.iter().filter_map(|r| r.value()).collect();
    let total = transform::reduce(&values, 0i64, |acc, v| acc.saturating_add(*v));
    let multiples = transform::filter(&values, |v| v % 4 == 0);
    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        total,
        multiples_of_four = multiples.len(),
        max = ?transform::max(&values),
        min = ?transform::min(&values),
        "Worker pool drained"
    );

    Ok(())
}

async fn repository(store: StoreKind) -> Result<Arc<dyn EntityRepository>, Box<dyn Error>> {
    match store {
        StoreKind::Memory => Ok(Arc::new(InMemoryEntityRepository::new())),
        StoreKind::Surreal => {
            db::init(DbConfig::memory()).await?;
            Ok(Arc::new(SurrealEntityRepository::from_global()?))
        }
    }
}

/// Walk the entity service through create, read, update and delete.
pub async fn run_service(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(store = ?config.store, "Running entity service scenario");

    let service = EntityService::with_config(repository(config.store).await?, config.service);

    for (name, contact) in [("ab", "ab@example.com"), ("johndoe", "bad-email")] {
        match service.create(name, contact, None).await {
            Err(ServiceError::Validation(e)) => tracing::info!("Rejected {:?}: {}", name, e),
            other => tracing::warn!("Unexpected outcome for {:?}: {:?}", name, other),
        }
    }

    let mut entity = service.create("johndoe", "john@example.com", None).await?;
    let id = entity.id.ok_or("repository did not assign an identity")?;
    tracing::info!(id = %id, status = ?entity.status, "Created entity");

    entity = entity
        .with_names("John", "Doe")
        .with_age(30)
        .with_address(Address::new("123 Main St", "Anytown", "12345").with_state("CA"));
    entity.set_status(EntityStatus::Active);
    entity.add_tag("demo");
    entity.set_metadata("source", "workbench");
    let updated = service.update(entity, None).await?;
    tracing::info!(
        id = %id,
        full_name = %updated.full_name(),
        active = updated.is_active(),
        tags = ?updated.tags,
        "Updated entity"
    );

    let loaded = service.read(id, None).await?;
    let tags = transform::map(&loaded.tags, |t| t.to_uppercase());
    tracing::info!(
        id = %id,
        has_demo_tag = transform::contains(&loaded.tags, &"demo".to_string()),
        tags = ?tags,
        "Read entity back"
    );

    service.delete(id, None).await?;
    match service.read(id, None).await {
        Err(ServiceError::NotFound { .. }) => tracing::info!(id = %id, "Entity deleted"),
        other => tracing::warn!("Entity still readable after delete: {:?}", other),
    }

    Ok(())
}
