//! Entity service configuration.

use std::time::Duration;

/// Deadline applied when a caller does not pass one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`EntityService`](crate::EntityService).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Budget for a call made without an explicit timeout.
    pub default_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Set the default call deadline.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}
