use std::sync::Arc;

use actors::{Doubling, JobHandler};
use pool_core::{JobResult, PoolConfig};

/// Pool config with no simulated latency, so tests stay fast.
pub fn fast_config(workers: usize, capacity: usize) -> PoolConfig {
    PoolConfig::default()
        .with_workers(workers)
        .with_capacity(capacity)
        .with_latency_ms(0)
}

pub fn doubling() -> Arc<dyn JobHandler> {
    Arc::new(Doubling)
}

/// Results ordered by source job, since workers finish out of order.
pub fn sorted(mut results: Vec<JobResult>) -> Vec<JobResult> {
    results.sort_by_key(|r| r.job_id);
    results
}
