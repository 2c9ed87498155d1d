//! Recovery configuration types

use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A policy that tries exactly once
    pub fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Build from the `max_retries` / `retry_backoff_ms` pair used in sink config
    pub fn from_retries(max_retries: u32, backoff_ms: u64) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            base_delay: Duration::from_millis(backoff_ms),
            max_delay: Duration::from_secs(5),
            ..Default::default()
        }
    }
}
