//! Message types for actor communication.

use pool_core::PoolStatus;
use ractor::RpcReplyPort;

/// Messages for the WorkerActor.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Pull the next job from the queue, or stop if it is drained.
    Poll,
}

/// Messages for the PoolSupervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Get a point-in-time view of the pool.
    GetStatus { reply: RpcReplyPort<PoolStatus> },
}
