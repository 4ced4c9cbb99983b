//! Pool supervisor: spawns the workers and acts as the completion barrier.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use pool_core::{Job, JobOutcome, JobResult, PoolConfig, PoolEvent, PoolStatus, PoolSummary};
use ractor::{Actor, ActorId, ActorProcessingErr, ActorRef, SupervisionEvent};
use tokio::sync::{broadcast, oneshot};

use crate::handler::JobHandler;
use crate::messages::{SupervisorMessage, WorkerMessage};
use crate::queue::BoundedQueue;
use crate::worker_actor::{WorkerActor, WorkerArgs};

/// Worker id stamped on results the supervisor publishes itself.
const SUPERVISOR_ID: &str = "pool-supervisor";

/// Counters shared by the producer side, the workers and the supervisor.
#[derive(Debug, Default)]
pub struct PoolCounters {
    pub submitted: AtomicU64,
    pub processed: AtomicU64,
    pub failed: AtomicU64,
}

/// State for the supervisor actor.
pub struct SupervisorState {
    /// Live workers by actor ID.
    workers: HashMap<ActorId, ActorRef<WorkerMessage>>,
    /// Worker names by actor ID, for logging.
    names: HashMap<ActorId, String>,
    /// Workers spawned in total.
    spawned: usize,
    /// Workers that terminated abnormally.
    worker_failures: usize,
    /// Closed once the last worker terminates, so producers stop waiting.
    jobs: Arc<BoundedQueue<Job>>,
    /// Closed once the last worker terminates.
    results: Arc<BoundedQueue<JobResult>>,
    counters: Arc<PoolCounters>,
    event_tx: broadcast::Sender<PoolEvent>,
    /// Receives the summary when the pool drains.
    done: Option<oneshot::Sender<PoolSummary>>,
}

impl SupervisorState {
    fn is_drained(&self) -> bool {
        self.done.is_none()
    }

    fn status(&self) -> PoolStatus {
        PoolStatus {
            active_workers: self.workers.len(),
            submitted: self.counters.submitted.load(Ordering::SeqCst),
            processed: self.counters.processed.load(Ordering::SeqCst),
            drained: self.is_drained(),
        }
    }

    /// Record a worker exit. Returns the worker's name if it was ours.
    fn worker_exited(&mut self, id: ActorId) -> Option<String> {
        self.workers.remove(&id)?;
        self.names.remove(&id)
    }

    /// Close both queues and report. Only valid once no worker is left.
    ///
    /// Jobs still queued at that point get a failed result each.
    async fn finish(&mut self) {
        self.jobs.close().await;
        while let Some(job) = self.jobs.dequeue().await {
            let result = JobResult {
                job_id: job.id,
                source: job.payload,
                worker_id: SUPERVISOR_ID.to_string(),
                duration_ms: 0,
                outcome: JobOutcome::Failed {
                    error: "no worker left to process the job".to_string(),
                },
            };
            if self.results.enqueue(result).await.is_err() {
                break;
            }
            self.counters.processed.fetch_add(1, Ordering::SeqCst);
            self.counters.failed.fetch_add(1, Ordering::SeqCst);
        }

        self.results.close().await;

        let summary = PoolSummary {
            workers: self.spawned,
            processed: self.counters.processed.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
            worker_failures: self.worker_failures,
        };

        tracing::info!(
            workers = summary.workers,
            processed = summary.processed,
            failed = summary.failed,
            "All workers terminated, result queue closed"
        );

        let _ = self.event_tx.send(PoolEvent::PoolDrained {
            summary: summary.clone(),
            timestamp: Utc::now(),
        });

        if let Some(done) = self.done.take() {
            let _ = done.send(summary);
        }
    }
}

/// Supervisor actor arguments.
pub struct SupervisorArgs {
    pub config: PoolConfig,
    pub jobs: Arc<BoundedQueue<Job>>,
    pub results: Arc<BoundedQueue<JobResult>>,
    pub handler: Arc<dyn JobHandler>,
    pub counters: Arc<PoolCounters>,
    pub event_tx: broadcast::Sender<PoolEvent>,
    pub done: oneshot::Sender<PoolSummary>,
}

/// Supervisor actor that owns the worker group.
///
/// Spawns exactly `config.workers` workers linked to itself and counts their
/// terminations. The result queue is closed only after the last one.
pub struct PoolSupervisor;

impl Actor for PoolSupervisor {
    type Msg = SupervisorMessage;
    type State = SupervisorState;
    type Arguments = SupervisorArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            workers = args.config.workers,
            capacity = args.config.capacity,
            "Starting pool supervisor"
        );

        let latency = Duration::from_millis(args.config.simulated_latency_ms);
        let mut workers = HashMap::new();
        let mut names = HashMap::new();

        for index in 1..=args.config.workers {
            let worker_id = format!("worker-{}", index);
            let worker_args = WorkerArgs {
                worker_id: worker_id.clone(),
                jobs: args.jobs.clone(),
                results: args.results.clone(),
                handler: args.handler.clone(),
                latency,
                counters: args.counters.clone(),
                event_tx: Some(args.event_tx.clone()),
            };

            match Actor::spawn_linked(None, WorkerActor, worker_args, myself.get_cell()).await {
                Ok((worker, _handle)) => {
                    names.insert(worker.get_id(), worker_id);
                    workers.insert(worker.get_id(), worker);
                }
                Err(e) => {
                    // Let the workers already running drain out.
                    args.jobs.close().await;
                    return Err(ActorProcessingErr::from(format!(
                        "Failed to spawn {}: {}",
                        worker_id, e
                    )));
                }
            }
        }

        Ok(SupervisorState {
            spawned: workers.len(),
            workers,
            names,
            worker_failures: 0,
            jobs: args.jobs,
            results: args.results,
            counters: args.counters,
            event_tx: args.event_tx,
            done: Some(args.done),
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisorMessage::GetStatus { reply } => {
                let _ = reply.send(state.status());
            }
        }

        Ok(())
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        message: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SupervisionEvent::ActorTerminated(cell, _, _reason) => {
                if let Some(name) = state.worker_exited(cell.get_id()) {
                    tracing::debug!(worker_id = %name, remaining = state.workers.len(), "Worker terminated");
                }
            }
            SupervisionEvent::ActorFailed(cell, error) => {
                if let Some(name) = state.worker_exited(cell.get_id()) {
                    state.worker_failures += 1;
                    tracing::warn!(worker_id = %name, "Worker failed: {}", error);
                }
            }
            _ => {}
        }

        if state.workers.is_empty() && !state.is_drained() {
            state.finish().await;
            myself.stop(None);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueClosed;
    use futures_util::StreamExt;
    use pool_core::JobId;

    fn state_with(
        jobs: Arc<BoundedQueue<Job>>,
        results: Arc<BoundedQueue<JobResult>>,
        done: oneshot::Sender<PoolSummary>,
    ) -> SupervisorState {
        let (event_tx, _) = broadcast::channel(16);
        SupervisorState {
            workers: HashMap::new(),
            names: HashMap::new(),
            spawned: 1,
            worker_failures: 1,
            jobs,
            results,
            counters: Arc::new(PoolCounters::default()),
            event_tx,
            done: Some(done),
        }
    }

    #[tokio::test]
    async fn finish_fails_stranded_jobs_and_closes_queues() {
        let jobs = Arc::new(BoundedQueue::new(4));
        let results = Arc::new(BoundedQueue::new(4));
        jobs.enqueue(Job::new(JobId(1), 10)).await.unwrap();
        jobs.enqueue(Job::new(JobId(2), 20)).await.unwrap();

        let (done_tx, done_rx) = oneshot::channel();
        let mut state = state_with(jobs.clone(), results.clone(), done_tx);
        state.finish().await;

        assert!(state.is_drained());
        assert!(jobs.is_closed());
        assert!(results.is_closed());
        assert!(matches!(
            jobs.enqueue(Job::new(JobId(3), 30)).await,
            Err(QueueClosed(_))
        ));

        let stranded: Vec<JobResult> = results.clone().drain().collect().await;
        assert_eq!(stranded.len(), 2);
        assert!(stranded.iter().all(|r| r.worker_id == SUPERVISOR_ID));
        assert!(stranded.iter().all(|r| !r.outcome.is_completed()));

        let summary = done_rx.await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.worker_failures, 1);
    }
}
