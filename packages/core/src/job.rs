//! Job domain types for work handed to the worker pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence number identifying a job, assigned by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// A unit of work. Immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Sequence number of this job.
    pub id: JobId,
    /// Numeric payload the handler transforms.
    pub payload: i64,
    /// When the producer created the job.
    pub enqueued_at: DateTime<Utc>,
}

impl Job {
    /// Create a job stamped with the current time.
    pub fn new(id: JobId, payload: i64) -> Self {
        Self {
            id,
            payload,
            enqueued_at: Utc::now(),
        }
    }
}

/// Tagged outcome of processing one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The handler produced a value.
    Completed { value: i64 },
    /// The handler rejected the job.
    Failed { error: String },
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }

    /// Get a simple outcome string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobOutcome::Completed { .. } => "completed",
            JobOutcome::Failed { .. } => "failed",
        }
    }
}

/// The result published for exactly one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// The job this result was derived from.
    pub job_id: JobId,
    /// Payload of the source job.
    pub source: i64,
    /// Worker that processed the job.
    pub worker_id: String,
    /// Wall time spent on the job, including simulated latency.
    pub duration_ms: u64,
    pub outcome: JobOutcome,
}

impl JobResult {
    /// The produced value, if the job completed.
    pub fn value(&self) -> Option<i64> {
        match self.outcome {
            JobOutcome::Completed { value } => Some(value),
            JobOutcome::Failed { .. } => None,
        }
    }

    /// The failure reason, if the job failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Completed { .. } => None,
            JobOutcome::Failed { error } => Some(error),
        }
    }
}
