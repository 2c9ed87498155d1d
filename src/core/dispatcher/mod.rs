//! Fan-out of finished events to the registered sinks
//!
//! Every sink owns a bounded queue and a worker task. Dispatching only
//! enqueues, so the caller never waits on I/O; a full queue drops the event
//! for that sink alone. Workers write in FIFO order and apply the sink's
//! retry policy. [`SinkDispatcher::drain`] closes the queues and waits for
//! the workers up to a deadline.

mod stats;


pub use stats::{DispatcherStats, DrainReport, SinkStats, SinkStatsSnapshot};

use crate::core::event::LogEvent;
use crate::core::sinks::Sink;
use crate::utils::error::PipelineError;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

type EventSender = mpsc::Sender<Arc<LogEvent>>;

struct Lane {
    name: String,
    sender: RwLock<Option<EventSender>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<SinkStats>,
}

/// Collects sinks before the dispatcher starts
pub struct SinkDispatcherBuilder {
    sinks: Vec<Arc<dyn Sink>>,
    queue_capacity: usize,
}

impl Default for SinkDispatcherBuilder {
    fn default() -> Self {
        Self {
            sinks: Vec::new(),
            queue_capacity: crate::config::default_queue_capacity(),
        }
    }
}

impl SinkDispatcherBuilder {
    /// Capacity of each sink's queue
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Register a sink
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sinks(mut self, sinks: impl IntoIterator<Item = Arc<dyn Sink>>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    /// Spawn one worker per sink. Must be called within a Tokio runtime.
    pub fn build(self) -> SinkDispatcher {
        let lanes = self
            .sinks
            .into_iter()
            .map(|sink| {
                let (sender, receiver) = mpsc::channel(self.queue_capacity);
                let stats = Arc::new(SinkStats::default());
                let name = sink.name().to_string();
                let worker = tokio::spawn(run_worker(sink, receiver, stats.clone()));
                debug!(sink = %name, capacity = self.queue_capacity, "Sink worker started");
                Lane {
                    name,
                    sender: RwLock::new(Some(sender)),
                    worker: Mutex::new(Some(worker)),
                    stats,
                }
            })
            .collect();

        SinkDispatcher {
            lanes,
            drained: AtomicBool::new(false),
        }
    }
}

/// Delivers each event to every registered sink
pub struct SinkDispatcher {
    lanes: Vec<Lane>,
    drained: AtomicBool,
}

impl SinkDispatcher {
    pub fn builder() -> SinkDispatcherBuilder {
        SinkDispatcherBuilder::default()
    }

    /// Names of the registered sinks, in registration order
    pub fn sink_names(&self) -> Vec<&str> {
        self.lanes.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Enqueue the event for every sink without waiting; returns how many
    /// sinks accepted it
    pub fn dispatch(&self, event: Arc<LogEvent>) -> usize {
        let mut accepted = 0;
        for lane in &self.lanes {
            let sender = lane.sender.read();
            let Some(sender) = sender.as_ref() else {
                lane.stats.record_dropped();
                debug!(sink = %lane.name, "Event dropped after shutdown");
                continue;
            };

            lane.stats.record_reserved();
            match sender.try_send(event.clone()) {
                Ok(()) => {
                    lane.stats.record_enqueued();
                    accepted += 1;
                }
                Err(TrySendError::Full(_)) => {
                    lane.stats.record_rejected();
                    warn!("{}, event dropped", PipelineError::queue_overflow(&lane.name));
                }
                Err(TrySendError::Closed(_)) => {
                    lane.stats.record_rejected();
                    warn!(
                        "{}, event dropped",
                        PipelineError::Shutdown(format!("worker for sink '{}' stopped", lane.name))
                    );
                }
            }
        }
        accepted
    }

    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            sinks: self
                .lanes
                .iter()
                .map(|l| l.stats.snapshot(&l.name))
                .collect(),
        }
    }

    /// Stop accepting events and flush the queues, waiting at most `timeout`
    ///
    /// Workers still running at the deadline are aborted and their pending
    /// events counted as lost. Calling this again is a no-op.
    pub async fn drain(&self, timeout: Duration) -> DrainReport {
        let started = Instant::now();
        if self.drained.swap(true, Ordering::SeqCst) {
            return DrainReport {
                completed: true,
                lost: 0,
                elapsed_ms: 0,
                sinks: self.stats().sinks,
            };
        }

        info!(sinks = self.lanes.len(), ?timeout, "Draining sink queues");

        for lane in &self.lanes {
            lane.sender.write().take();
        }

        let workers = self
            .lanes
            .iter()
            .filter_map(|l| l.worker.lock().take())
            .collect::<Vec<_>>();
        let abort_handles = workers.iter().map(|w| w.abort_handle()).collect::<Vec<_>>();

        let completed = match tokio::time::timeout(timeout, join_all(workers)).await {
            Ok(results) => {
                for result in results {
                    if let Err(e) = result {
                        error!("Sink worker ended abnormally: {}", e);
                    }
                }
                true
            }
            Err(_) => {
                for handle in &abort_handles {
                    handle.abort();
                }
                false
            }
        };

        let mut lost = 0;
        if !completed {
            for lane in &self.lanes {
                let lane_lost = lane.stats.record_lost();
                if lane_lost > 0 {
                    warn!(sink = %lane.name, lost = lane_lost, "Events lost at shutdown");
                }
                lost += lane_lost;
            }
        }

        let report = DrainReport {
            completed,
            lost,
            elapsed_ms: started.elapsed().as_millis() as u64,
            sinks: self.stats().sinks,
        };
        info!(
            completed = report.completed,
            lost = report.lost,
            elapsed_ms = report.elapsed_ms,
            "Sink queues drained"
        );
        report
    }
}

async fn run_worker(
    sink: Arc<dyn Sink>,
    mut receiver: mpsc::Receiver<Arc<LogEvent>>,
    stats: Arc<SinkStats>,
) {
    let policy = sink.retry_policy();

    while let Some(event) = receiver.recv().await {
        let attempts = AtomicU32::new(0);
        let (target, attempt_count, current) = (&sink, &attempts, &event);

        let result = policy
            .call_when(
                move || {
                    attempt_count.fetch_add(1, Ordering::Relaxed);
                    target.write(current)
                },
                PipelineError::is_retryable,
            )
            .await;

        let attempts = attempts.load(Ordering::Relaxed);
        match result {
            Ok(()) => stats.record_attempted(attempts, true),
            Err(e) => {
                stats.record_attempted(attempts, false);
                error!(sink = %sink.name(), attempts, "Failed to write event: {}", e);
            }
        }
    }

    if let Err(e) = sink.flush().await {
        warn!(sink = %sink.name(), "Failed to flush sink: {}", e);
    }
    debug!(sink = %sink.name(), "Sink worker stopped");
}
