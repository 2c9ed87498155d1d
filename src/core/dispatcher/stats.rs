//! Delivery counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters of one sink lane
#[derive(Debug, Default)]
pub struct SinkStats {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
    write_failures: AtomicU64,
    retries: AtomicU64,
    lost_at_shutdown: AtomicU64,
    pending: AtomicU64,
}

impl SinkStats {
    /// Count an event as pending before it is offered to the queue, so the
    /// worker can never finish it first
    pub(crate) fn record_reserved(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// The queue refused a reserved event
    pub(crate) fn record_rejected(&self) {
        self.release_pending();
        self.record_dropped();
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn release_pending(&self) {
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| Some(p.saturating_sub(1)));
    }

    /// One queued event has been handled, successfully or not
    pub(crate) fn record_attempted(&self, attempts: u32, delivered: bool) {
        if attempts > 1 {
            self.retries
                .fetch_add(u64::from(attempts - 1), Ordering::Relaxed);
        }
        if delivered {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.release_pending();
    }

    /// Whatever is still pending is lost; returns how many
    pub(crate) fn record_lost(&self) -> u64 {
        let lost = self.pending.swap(0, Ordering::AcqRel);
        self.lost_at_shutdown.fetch_add(lost, Ordering::Relaxed);
        lost
    }

    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::Acquire)
    }

    pub fn snapshot(&self, sink: &str) -> SinkStatsSnapshot {
        SinkStatsSnapshot {
            sink: sink.to_string(),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            lost_at_shutdown: self.lost_at_shutdown.load(Ordering::Relaxed),
            pending: self.pending(),
        }
    }
}

/// Point-in-time copy of one sink's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkStatsSnapshot {
    pub sink: String,
    /// Accepted into the sink's queue
    pub enqueued: u64,
    /// Written successfully
    pub delivered: u64,
    /// Rejected because the queue was full or closed
    pub dropped: u64,
    /// Given up on after every attempt failed
    pub write_failures: u64,
    /// Extra attempts beyond the first
    pub retries: u64,
    /// Still queued when the drain deadline passed
    pub lost_at_shutdown: u64,
    /// Queued or in flight right now
    pub pending: u64,
}

/// Counters of every sink, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatcherStats {
    pub sinks: Vec<SinkStatsSnapshot>,
}

impl DispatcherStats {
    pub fn sink(&self, name: &str) -> Option<&SinkStatsSnapshot> {
        self.sinks.iter().find(|s| s.sink == name)
    }

    pub fn total_delivered(&self) -> u64 {
        self.sinks.iter().map(|s| s.delivered).sum()
    }

    pub fn total_dropped(&self) -> u64 {
        self.sinks.iter().map(|s| s.dropped).sum()
    }

    pub fn total_write_failures(&self) -> u64 {
        self.sinks.iter().map(|s| s.write_failures).sum()
    }
}

/// Result of draining the dispatcher at shutdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Every queue was flushed before the deadline
    pub completed: bool,
    /// Events abandoned because the deadline passed
    pub lost: u64,
    pub elapsed_ms: u64,
    pub sinks: Vec<SinkStatsSnapshot>,
}
