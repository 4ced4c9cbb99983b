//! Job handler trait and the built-in transforms.

use pool_core::Job;
use std::future::Future;
use std::pin::Pin;

/// Result type for job handlers: the produced value or a failure reason.
pub type HandlerResult = Result<i64, String>;

/// Future type for async job handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Trait for job handlers.
///
/// Implement this trait to define how a worker turns a job into a result.
/// Failures are reported as a tagged result, never by dropping the job.
pub trait JobHandler: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Process a job and return the result.
    fn handle(&self, job: &Job) -> HandlerFuture;
}

/// Doubles the job payload. Overflow is reported as a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct Doubling;

impl JobHandler for Doubling {
    fn name(&self) -> &str {
        "doubling"
    }

    fn handle(&self, job: &Job) -> HandlerFuture {
        let payload = job.payload;
        Box::pin(async move {
            payload
                .checked_mul(2)
                .ok_or_else(|| format!("doubling {} overflows", payload))
        })
    }
}

/// A simple function-based job handler.
pub struct FnHandler<F>
where
    F: Fn(&Job) -> HandlerFuture + Send + Sync + 'static,
{
    name: String,
    handler: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Job) -> HandlerFuture + Send + Sync + 'static,
{
    /// Create a new function-based handler.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> JobHandler for FnHandler<F>
where
    F: Fn(&Job) -> HandlerFuture + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, job: &Job) -> HandlerFuture {
        (self.handler)(job)
    }
}

/// Helper macro for creating job handlers from async blocks.
#[macro_export]
macro_rules! job_handler {
    ($name:expr, |$job:ident| $body:expr) => {
        $crate::FnHandler::new($name, |$job: &$crate::pool_core::Job| {
            let $job = $job.clone();
            Box::pin(async move {
                let result: $crate::HandlerResult = $body;
                result
            }) as $crate::HandlerFuture
        })
    };
}
