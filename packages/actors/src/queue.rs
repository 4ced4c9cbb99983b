//! Bounded multi-producer, multi-consumer handoff queue with a one-shot close.

use futures_util::Stream;
use futures_util::stream;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};

/// Returned by [`BoundedQueue::enqueue`] once the queue is closed.
///
/// Hands the rejected item back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("queue is closed")]
pub struct QueueClosed<T>(pub T);

/// A bounded FIFO queue shared between producers and consumers.
///
/// - `enqueue` waits while the queue is full.
/// - `dequeue` waits while the queue is empty and open, and yields `None`
///   once it is closed and drained.
/// - `close` is one-shot: later calls are no-ops, later enqueues fail,
///   enqueues still waiting for capacity fail and hand their item back, and
///   every waiting consumer is released after the remaining items drain.
///
/// Each item is handed to exactly one consumer.
pub struct BoundedQueue<T> {
    sender: Mutex<Option<mpsc::Sender<T>>>,
    receiver: Mutex<mpsc::Receiver<T>>,
    closed: watch::Sender<bool>,
    capacity: usize,
}

impl<T: Send + 'static> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let (closed, _) = watch::channel(false);
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(rx),
            closed,
            capacity,
        }
    }

    /// Maximum number of buffered items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add an item, waiting for free capacity.
    ///
    /// Fails if the queue is closed before capacity frees up.
    pub async fn enqueue(&self, item: T) -> Result<(), QueueClosed<T>> {
        // Clone the sender so a full queue never blocks `close`.
        let sender = match self.sender.lock().await.as_ref() {
            Some(sender) => sender.clone(),
            None => return Err(QueueClosed(item)),
        };
        let mut closed = self.closed.subscribe();

        tokio::select! {
            biased;
            _ = closed.wait_for(|closed| *closed) => Err(QueueClosed(item)),
            permit = sender.reserve() => match permit {
                Ok(permit) if !self.is_closed() => {
                    permit.send(item);
                    Ok(())
                }
                _ => Err(QueueClosed(item)),
            },
        }
    }

    /// Take the next item, waiting while the queue is open and empty.
    ///
    /// Returns `None` once the queue is closed and empty.
    pub async fn dequeue(&self) -> Option<T> {
        self.receiver.lock().await.recv().await
    }

    /// Signal that no more items will be enqueued.
    pub async fn close(&self) {
        self.closed.send_replace(true);
        self.sender.lock().await.take();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Stream every remaining item until the queue is closed and drained.
    pub fn drain(self: Arc<Self>) -> impl Stream<Item = T> + Send {
        stream::unfold(self, |queue| async move {
            let item = queue.dequeue().await?;
            Some((item, queue))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn fifo_until_closed() {
        let queue = BoundedQueue::new(4);
        for i in 1..=3 {
            queue.enqueue(i).await.unwrap();
        }
        queue.close().await;

        assert_eq!(queue.dequeue().await, Some(1));
        assert_eq!(queue.dequeue().await, Some(2));
        assert_eq!(queue.dequeue().await, Some(3));
        assert_eq!(queue.dequeue().await, None);
        assert_eq!(queue.dequeue().await, None);
    }

    #[tokio::test]
    async fn enqueue_after_close_returns_item() {
        let queue = BoundedQueue::new(1);
        queue.close().await;
        queue.close().await;

        assert!(queue.is_closed());
        assert_eq!(queue.enqueue(7).await, Err(QueueClosed(7)));
    }

    #[tokio::test]
    async fn close_releases_waiting_consumers() {
        let queue = Arc::new(BoundedQueue::<u32>::new(2));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                tokio::spawn(async move { queue.dequeue().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.close().await;

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn full_queue_blocks_producer_until_consumed() {
        let queue = Arc::new(BoundedQueue::new(1));
        queue.enqueue(1).await.unwrap();

        let producer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.enqueue(2).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!producer.is_finished());

        assert_eq!(queue.dequeue().await, Some(1));
        producer.await.unwrap().unwrap();
        assert_eq!(queue.dequeue().await, Some(2));
    }

    #[tokio::test]
    async fn close_rejects_producer_waiting_for_capacity() {
        let queue = Arc::new(BoundedQueue::new(1));
        queue.enqueue(1).await.unwrap();

        let producer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.enqueue(2).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!producer.is_finished());

        queue.close().await;
        assert_eq!(producer.await.unwrap(), Err(QueueClosed(2)));

        assert_eq!(queue.dequeue().await, Some(1));
        assert_eq!(queue.dequeue().await, None);
    }

    #[tokio::test]
    async fn drain_stream_ends_on_close() {
        let queue = Arc::new(BoundedQueue::new(8));
        for i in 0..5 {
            queue.enqueue(i).await.unwrap();
        }
        queue.close().await;

        let items: Vec<i32> = queue.drain().collect().await;
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }
}
