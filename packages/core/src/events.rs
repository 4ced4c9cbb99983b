//! Event types broadcast by a running worker pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, JobOutcome, PoolSummary};

/// Events emitted by the worker pool for observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    // Worker events
    /// A worker started and is pulling jobs.
    WorkerStarted {
        worker_id: String,
        timestamp: DateTime<Utc>,
    },
    /// A worker found the job queue closed and empty.
    WorkerStopped {
        worker_id: String,
        processed: u64,
        timestamp: DateTime<Utc>,
    },

    // Job events
    /// A worker dequeued a job.
    JobStarted {
        job_id: JobId,
        worker_id: String,
        timestamp: DateTime<Utc>,
    },
    /// A job's result was published.
    JobFinished {
        job_id: JobId,
        worker_id: String,
        outcome: JobOutcome,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    // Pool events
    /// Every worker terminated and the result queue was closed.
    PoolDrained {
        summary: PoolSummary,
        timestamp: DateTime<Utc>,
    },
}

impl PoolEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PoolEvent::WorkerStarted { timestamp, .. } => *timestamp,
            PoolEvent::WorkerStopped { timestamp, .. } => *timestamp,
            PoolEvent::JobStarted { timestamp, .. } => *timestamp,
            PoolEvent::JobFinished { timestamp, .. } => *timestamp,
            PoolEvent::PoolDrained { timestamp, .. } => *timestamp,
        }
    }

    /// Get the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            PoolEvent::JobStarted { job_id, .. } => Some(*job_id),
            PoolEvent::JobFinished { job_id, .. } => Some(*job_id),
            _ => None,
        }
    }

    /// Get the worker ID associated with this event, if any.
    pub fn worker_id(&self) -> Option<&str> {
        match self {
            PoolEvent::WorkerStarted { worker_id, .. }
            | PoolEvent::WorkerStopped { worker_id, .. }
            | PoolEvent::JobStarted { worker_id, .. }
            | PoolEvent::JobFinished { worker_id, .. } => Some(worker_id),
            PoolEvent::PoolDrained { .. } => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            PoolEvent::WorkerStarted { worker_id, .. } => format!("Worker {} started", worker_id),
            PoolEvent::WorkerStopped {
                worker_id,
                processed,
                ..
            } => format!("Worker {} stopped after {} jobs", worker_id, processed),
            PoolEvent::JobStarted {
                job_id, worker_id, ..
            } => format!("Job {} started by {}", job_id, worker_id),
            PoolEvent::JobFinished {
                job_id,
                outcome,
                duration_ms,
                ..
            } => match outcome {
                JobOutcome::Completed { value } => {
                    format!("Job {} completed in {}ms: {}", job_id, duration_ms, value)
                }
                JobOutcome::Failed { error } => format!("Job {} failed: {}", job_id, error),
            },
            PoolEvent::PoolDrained { summary, .. } => format!(
                "Pool drained: {} results from {} workers",
                summary.processed, summary.workers
            ),
        }
    }
}
