//! In-memory sink for tests and local inspection

use super::Sink;
use crate::core::event::LogEvent;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Keeps every written event in memory
///
/// Can be switched into a failing mode to stand in for an unreachable store,
/// and can add a per-write delay to stand in for a slow one.
pub struct MemorySink {
    name: String,
    events: Mutex<Vec<LogEvent>>,
    failing: AtomicBool,
    attempts: AtomicU64,
    delay: Option<Duration>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
            delay: None,
        }
    }

    /// A sink whose writes always fail
    pub fn failing(name: impl Into<String>) -> Self {
        let sink = Self::new(name);
        sink.set_failing(true);
        sink
    }

    /// Delay every write by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Copies of the events written so far, in delivery order
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of write attempts, failed ones included
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&self, event: &LogEvent) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PipelineError::sink_write(&self.name, "sink unavailable"));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}
