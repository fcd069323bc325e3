use std::time::Duration;

use crate::retry::RetryPolicy;

/// Settings for [`crate::app_system::OrderSystem`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSystemConfig {
    /// Mailbox capacity of each store actor
    pub buffer_size: usize,
    /// Upper bound on any single store request
    pub store_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for OrderSystemConfig {
    fn default() -> Self {
        Self {
            buffer_size: 100,
            store_timeout: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}
