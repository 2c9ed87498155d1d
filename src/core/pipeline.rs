//! The logging pipeline: capture, enrich, filter and dispatch

use crate::config::{PipelineConfig, Validate};
use crate::core::context::{PropertyBag, ScopedContext};
use crate::core::dispatcher::{DispatcherStats, DrainReport, SinkDispatcher};
use crate::core::event::{Enricher, ExceptionDetails, LogEvent, LogLevel, well_known};
use crate::core::sinks::{self, Sink};
use crate::utils::error::{PipelineError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

struct PipelineInner {
    config: PipelineConfig,
    enricher: Enricher,
    dispatcher: SinkDispatcher,
    /// Lowest level any source may log at
    floor: LogLevel,
}

/// Shared handle to the running pipeline
///
/// Cheap to clone; every clone feeds the same sinks.
#[derive(Clone)]
pub struct LoggingPipeline {
    inner: Arc<PipelineInner>,
}

impl LoggingPipeline {
    /// Validate the configuration, start every sink and their workers
    ///
    /// A sink that fails to start is reported and left out; startup only
    /// fails when no configured sink could be started.
    pub async fn from_config(config: PipelineConfig) -> Result<Self> {
        config.check_section("Pipeline")?;

        let mut started: Vec<Arc<dyn Sink>> = Vec::with_capacity(config.sinks.len());
        for (index, sink_config) in config.sinks.iter().enumerate() {
            match sinks::build_sink(sink_config).await {
                Ok(sink) => {
                    debug!(index, kind = sink_config.kind(), "Sink started");
                    started.push(sink);
                }
                Err(e) => {
                    error!(index, kind = sink_config.kind(), "Failed to start sink: {}", e);
                }
            }
        }

        if started.is_empty() {
            return Err(PipelineError::Config(
                "No configured sink could be started".to_string(),
            ));
        }

        Ok(Self::with_sinks(config, started))
    }

    /// Build around already-constructed sinks. Must be called within a Tokio runtime.
    pub fn with_sinks(config: PipelineConfig, sinks: Vec<Arc<dyn Sink>>) -> Self {
        let enricher = Enricher::new(
            config.service_name.clone(),
            config.environment.clone(),
            config.host_name(),
        );
        let dispatcher = SinkDispatcher::builder()
            .queue_capacity(config.queue_capacity)
            .sinks(sinks)
            .build();
        let floor = config
            .level_overrides
            .values()
            .copied()
            .fold(config.minimum_level, LogLevel::min);

        info!(
            service = %config.service_name,
            environment = %config.environment,
            sinks = ?dispatcher.sink_names(),
            "Logging pipeline started"
        );

        Self {
            inner: Arc::new(PipelineInner {
                config,
                enricher,
                dispatcher,
                floor,
            }),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    pub fn enricher(&self) -> &Enricher {
        &self.inner.enricher
    }

    /// Whether an event at `level` from `source` would be kept
    pub fn is_enabled(&self, level: LogLevel, source: Option<&str>) -> bool {
        level >= self.inner.config.minimum_level_for(source)
    }

    /// Capture an event from `context` and hand it to every sink
    ///
    /// Returns the frozen event, or `None` when it was filtered out by level.
    /// Never waits on sink I/O.
    pub fn emit(
        &self,
        context: &ScopedContext,
        level: LogLevel,
        message_template: &str,
        fields: PropertyBag,
    ) -> Option<Arc<LogEvent>> {
        self.write(context, level, message_template, fields, None)
    }

    /// Like [`emit`](Self::emit), attaching failure details
    pub fn emit_error(
        &self,
        context: &ScopedContext,
        level: LogLevel,
        message_template: &str,
        fields: PropertyBag,
        exception: ExceptionDetails,
    ) -> Option<Arc<LogEvent>> {
        self.write(context, level, message_template, fields, Some(exception))
    }

    /// Request completion events bypass level filtering so every request
    /// produces exactly one
    pub(crate) fn emit_completion(
        &self,
        context: &ScopedContext,
        message_template: &str,
        fields: PropertyBag,
        exception: Option<ExceptionDetails>,
    ) -> Arc<LogEvent> {
        let event = LogEvent::capture(
            LogLevel::Information,
            message_template,
            &fields,
            context,
            &self.inner.enricher,
            exception,
        );
        self.publish(event)
    }

    fn write(
        &self,
        context: &ScopedContext,
        level: LogLevel,
        message_template: &str,
        fields: PropertyBag,
        exception: Option<ExceptionDetails>,
    ) -> Option<Arc<LogEvent>> {
        if level < self.inner.floor {
            return None;
        }

        let event = LogEvent::capture(
            level,
            message_template,
            &fields,
            context,
            &self.inner.enricher,
            exception,
        );

        let source = event
            .properties()
            .get(well_known::SOURCE_CONTEXT)
            .and_then(|v| v.as_str());
        if !self.is_enabled(level, source) {
            return None;
        }
        Some(self.publish(event))
    }

    fn publish(&self, event: LogEvent) -> Arc<LogEvent> {
        let event = Arc::new(event);
        self.inner.dispatcher.dispatch(event.clone());
        event
    }

    pub fn stats(&self) -> DispatcherStats {
        self.inner.dispatcher.stats()
    }

    /// Drain every sink queue within the configured shutdown timeout
    pub async fn shutdown(&self) -> DrainReport {
        self.shutdown_with_timeout(self.inner.config.shutdown_timeout())
            .await
    }

    pub async fn shutdown_with_timeout(&self, timeout: Duration) -> DrainReport {
        info!("Shutting down logging pipeline");
        self.inner.dispatcher.drain(timeout).await
    }
}

impl std::fmt::Debug for LoggingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingPipeline")
            .field("service", &self.inner.config.service_name)
            .field("sinks", &self.inner.dispatcher.sink_names())
            .finish()
    }
}
