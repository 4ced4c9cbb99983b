//! Worker pool configuration and summary types.

use serde::{Deserialize, Serialize};

/// Configuration for a worker pool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Capacity of both the job queue and the result queue.
    pub capacity: usize,
    /// Simulated latency per job (milliseconds).
    pub simulated_latency_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            capacity: 10,
            simulated_latency_ms: 100,
        }
    }
}

impl PoolConfig {
    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the queue capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the simulated per-job latency.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.simulated_latency_ms = latency_ms;
        self
    }

    /// Check the configuration, returning a description of the first problem.
    pub fn check(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("worker count must be at least 1".into());
        }
        if self.capacity == 0 {
            return Err("queue capacity must be at least 1".into());
        }
        Ok(())
    }
}

/// Final accounting for a pool once its result queue has closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    /// Workers spawned by the supervisor.
    pub workers: usize,
    /// Results published (completed and failed).
    pub processed: u64,
    /// Results tagged as failed.
    pub failed: u64,
    /// Workers that terminated abnormally.
    pub worker_failures: usize,
}

impl PoolSummary {
    /// Results tagged as completed.
    pub fn completed(&self) -> u64 {
        self.processed - self.failed
    }
}

/// Point-in-time view of a running pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Workers that have not yet terminated.
    pub active_workers: usize,
    /// Jobs accepted by the producer side.
    pub submitted: u64,
    /// Results published so far.
    pub processed: u64,
    /// Whether the result queue has been closed.
    pub drained: bool,
}
