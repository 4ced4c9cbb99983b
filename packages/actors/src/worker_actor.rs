//! Worker actor for executing jobs.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::FutureExt;
use pool_core::{Job, JobOutcome, JobResult, PoolEvent};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;

use crate::handler::JobHandler;
use crate::messages::WorkerMessage;
use crate::queue::BoundedQueue;
use crate::supervisor::PoolCounters;

/// State for the worker actor.
pub struct WorkerActorState {
    /// Unique worker ID within the pool.
    pub worker_id: String,
    /// Queue this worker pulls jobs from.
    jobs: Arc<BoundedQueue<Job>>,
    /// Queue this worker publishes results to.
    results: Arc<BoundedQueue<JobResult>>,
    /// Transform applied to each job.
    handler: Arc<dyn JobHandler>,
    /// Simulated work per job.
    latency: Duration,
    /// Pool-wide counters.
    counters: Arc<PoolCounters>,
    /// Event broadcaster.
    event_tx: Option<broadcast::Sender<PoolEvent>>,
    /// Jobs this worker has published results for.
    pub processed: u64,
}

impl WorkerActorState {
    fn broadcast(&self, event: PoolEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Run one job through the handler. Always yields exactly one result.
    async fn process(&self, job: Job) -> JobResult {
        let started = Instant::now();

        self.broadcast(PoolEvent::JobStarted {
            job_id: job.id,
            worker_id: self.worker_id.clone(),
            timestamp: Utc::now(),
        });
        tracing::debug!(worker_id = %self.worker_id, job_id = %job.id, "Processing job");

        tokio::time::sleep(self.latency).await;

        let handled = AssertUnwindSafe(async { self.handler.handle(&job).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(panic_message(panic.as_ref())));

        let outcome = match handled {
            Ok(value) => JobOutcome::Completed { value },
            Err(error) => {
                tracing::warn!(
                    worker_id = %self.worker_id,
                    job_id = %job.id,
                    handler = self.handler.name(),
                    "Job failed: {}",
                    error
                );
                JobOutcome::Failed { error }
            }
        };

        JobResult {
            job_id: job.id,
            source: job.payload,
            worker_id: self.worker_id.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            outcome,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("handler panicked: {}", detail)
}

/// Worker actor arguments.
pub struct WorkerArgs {
    pub worker_id: String,
    pub jobs: Arc<BoundedQueue<Job>>,
    pub results: Arc<BoundedQueue<JobResult>>,
    pub handler: Arc<dyn JobHandler>,
    pub latency: Duration,
    pub counters: Arc<PoolCounters>,
    pub event_tx: Option<broadcast::Sender<PoolEvent>>,
}

/// Worker actor that drains the job queue.
///
/// Each `Poll` takes one job, publishes its result and schedules the next
/// poll. When the job queue is closed and empty the worker stops itself,
/// which its supervisor observes as a termination.
pub struct WorkerActor;

impl Actor for WorkerActor {
    type Msg = WorkerMessage;
    type State = WorkerActorState;
    type Arguments = WorkerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting worker: {}", args.worker_id);

        let state = WorkerActorState {
            worker_id: args.worker_id,
            jobs: args.jobs,
            results: args.results,
            handler: args.handler,
            latency: args.latency,
            counters: args.counters,
            event_tx: args.event_tx,
            processed: 0,
        };

        state.broadcast(PoolEvent::WorkerStarted {
            worker_id: state.worker_id.clone(),
            timestamp: Utc::now(),
        });

        // Start the work loop
        myself.send_message(WorkerMessage::Poll)?;

        Ok(state)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WorkerMessage::Poll => {
                let Some(job) = state.jobs.dequeue().await else {
                    tracing::info!(
                        worker_id = %state.worker_id,
                        processed = state.processed,
                        "Job queue drained, stopping worker"
                    );
                    state.broadcast(PoolEvent::WorkerStopped {
                        worker_id: state.worker_id.clone(),
                        processed: state.processed,
                        timestamp: Utc::now(),
                    });
                    myself.stop(None);
                    return Ok(());
                };

                let result = state.process(job).await;
                let event = PoolEvent::JobFinished {
                    job_id: result.job_id,
                    worker_id: state.worker_id.clone(),
                    outcome: result.outcome.clone(),
                    duration_ms: result.duration_ms,
                    timestamp: Utc::now(),
                };
                let failed = !result.outcome.is_completed();

                // The supervisor only closes the result queue after this
                // worker terminates, so a rejection here is a broken invariant.
                state.results.enqueue(result).await.map_err(|rejected| {
                    ActorProcessingErr::from(format!(
                        "Result queue closed while {} was active ({})",
                        state.worker_id, rejected.0.job_id
                    ))
                })?;

                state.processed += 1;
                state.counters.processed.fetch_add(1, Ordering::SeqCst);
                if failed {
                    state.counters.failed.fetch_add(1, Ordering::SeqCst);
                }
                state.broadcast(event);

                myself.send_message(WorkerMessage::Poll)?;
            }
        }

        Ok(())
    }
}
