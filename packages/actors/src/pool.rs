//! Worker pool facade: producer, collector and completion handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use pool_core::{Job, JobId, JobResult, PoolConfig, PoolEvent, PoolStatus, PoolSummary};
use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorRef};
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};

use crate::handler::JobHandler;
use crate::messages::SupervisorMessage;
use crate::queue::{BoundedQueue, QueueClosed};
use crate::supervisor::{PoolCounters, PoolSupervisor, SupervisorArgs};

/// Errors surfaced by the worker pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Invalid pool config: {0}")]
    InvalidConfig(String),

    #[error("Job queue is closed, {0} rejected")]
    QueueClosed(JobId),

    #[error("Failed to spawn pool supervisor: {0}")]
    Spawn(#[from] ractor::SpawnErr),

    #[error("Supervisor error: {0}")]
    Supervisor(String),
}

/// A running pool of workers.
///
/// One producer submits jobs and then calls [`close`](Self::close); any
/// number of consumers read results until the stream ends. The result
/// stream ends only after every worker has terminated.
pub struct WorkerPool {
    jobs: Arc<BoundedQueue<Job>>,
    results: Arc<BoundedQueue<JobResult>>,
    counters: Arc<PoolCounters>,
    next_id: AtomicU64,
    event_tx: broadcast::Sender<PoolEvent>,
    supervisor: ActorRef<SupervisorMessage>,
    supervisor_handle: JoinHandle<()>,
    done: oneshot::Receiver<PoolSummary>,
    workers: usize,
}

impl WorkerPool {
    /// Start a pool with its own event channel.
    pub async fn start(config: PoolConfig, handler: Arc<dyn JobHandler>) -> Result<Self, PoolError> {
        let (event_tx, _) = broadcast::channel(1024);
        Self::start_observed(config, handler, event_tx).await
    }

    /// Start a pool publishing events on `event_tx`.
    ///
    /// Subscribe before calling this to observe worker start-up.
    pub async fn start_observed(
        config: PoolConfig,
        handler: Arc<dyn JobHandler>,
        event_tx: broadcast::Sender<PoolEvent>,
    ) -> Result<Self, PoolError> {
        config.check().map_err(PoolError::InvalidConfig)?;

        let jobs = Arc::new(BoundedQueue::new(config.capacity));
        let results = Arc::new(BoundedQueue::new(config.capacity));
        let counters = Arc::new(PoolCounters::default());
        let (done_tx, done) = oneshot::channel();
        let workers = config.workers;

        tracing::info!(workers, handler = handler.name(), "Starting worker pool");

        let args = SupervisorArgs {
            config,
            jobs: jobs.clone(),
            results: results.clone(),
            handler,
            counters: counters.clone(),
            event_tx: event_tx.clone(),
            done: done_tx,
        };
        let (supervisor, supervisor_handle) = Actor::spawn(None, PoolSupervisor, args).await?;

        Ok(Self {
            jobs,
            results,
            counters,
            next_id: AtomicU64::new(1),
            event_tx,
            supervisor,
            supervisor_handle,
            done,
            workers,
        })
    }

    /// Number of workers in the pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submit a job, waiting while the job queue is full.
    pub async fn submit(&self, payload: i64) -> Result<JobId, PoolError> {
        let id = JobId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.jobs
            .enqueue(Job::new(id, payload))
            .await
            .map_err(|QueueClosed(job)| PoolError::QueueClosed(job.id))?;
        self.counters.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    /// Signal that no more jobs will be submitted.
    pub async fn close(&self) {
        self.jobs.close().await;
    }

    /// Next published result, or `None` once every worker has finished and
    /// all results were consumed.
    pub async fn next_result(&self) -> Option<JobResult> {
        self.results.dequeue().await
    }

    /// Stream of results until the result queue closes.
    pub fn results(&self) -> impl Stream<Item = JobResult> + Send + 'static {
        self.results.clone().drain()
    }

    /// Subscribe to pool events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.event_tx.subscribe()
    }

    /// Point-in-time status of the pool.
    pub async fn status(&self) -> PoolStatus {
        let reply = ractor::rpc::call(
            &self.supervisor,
            |reply| SupervisorMessage::GetStatus { reply },
            Some(Duration::from_secs(5)),
        )
        .await;

        match reply {
            Ok(ractor::rpc::CallResult::Success(status)) => status,
            // The supervisor stops itself once the pool has drained.
            _ => PoolStatus {
                active_workers: 0,
                submitted: self.counters.submitted.load(Ordering::SeqCst),
                processed: self.counters.processed.load(Ordering::SeqCst),
                drained: self.results.is_closed(),
            },
        }
    }

    /// Wait for every worker to terminate and the result queue to close.
    ///
    /// Results must be consumed concurrently, or workers blocked on a full
    /// result queue will never finish.
    pub async fn wait(self) -> Result<PoolSummary, PoolError> {
        let summary = self.done.await.map_err(|_| {
            PoolError::Supervisor("supervisor stopped before the pool drained".into())
        })?;
        self.supervisor_handle
            .await
            .map_err(|e| PoolError::Supervisor(e.to_string()))?;
        Ok(summary)
    }

    /// Run `payloads` through a fresh pool, producing and collecting concurrently.
    pub async fn run(
        config: PoolConfig,
        handler: Arc<dyn JobHandler>,
        payloads: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<JobResult>, PoolSummary), PoolError> {
        let pool = Self::start(config, handler).await?;

        let produce = async {
            let mut outcome = Ok(());
            for payload in payloads {
                if let Err(e) = pool.submit(payload).await {
                    outcome = Err(e);
                    break;
                }
            }
            pool.close().await;
            outcome
        };
        let collect = pool.results().collect::<Vec<_>>();

        let (produced, results) = tokio::join!(produce, collect);
        produced?;

        let summary = pool.wait().await?;
        Ok((results, summary))
    }
}
