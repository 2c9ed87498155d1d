//! Console sink

use super::Sink;
use crate::config::{ConsoleFormat, ConsoleSinkConfig};
use crate::core::event::LogEvent;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;

/// Writes one line per event
pub struct ConsoleSink {
    config: ConsoleSinkConfig,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink writing to stdout
    pub fn stdout(config: ConsoleSinkConfig) -> Self {
        Self::with_writer(config, Box::new(std::io::stdout()))
    }

    /// Console sink writing to any writer
    pub fn with_writer(config: ConsoleSinkConfig, writer: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            writer: Mutex::new(writer),
        }
    }

    /// Format one event as a single line, without the trailing newline
    pub fn format_line(&self, event: &LogEvent) -> Result<String> {
        match self.config.format {
            ConsoleFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
                "timestamp": event.timestamp().to_rfc3339(),
                "level": event.level(),
                "message": event.render_message(),
                "template": event.message_template(),
                "properties": event.properties(),
                "exception": event.exception().map(|e| e.to_string()),
            }))?),
            ConsoleFormat::Text => {
                let mut line = format!(
                    "[{} {}] {}",
                    event.timestamp().format("%Y-%m-%d %H:%M:%S%.3f"),
                    event.level().short_name(),
                    event.render_message()
                );
                if self.config.include_properties && !event.properties().is_empty() {
                    line.push(' ');
                    line.push_str(&serde_json::to_string(event.properties())?);
                }
                if let Some(exception) = event.exception() {
                    line.push_str(" | ");
                    line.push_str(&exception.to_string().replace('\n', " | "));
                }
                Ok(line)
            }
        }
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn write(&self, event: &LogEvent) -> Result<()> {
        let line = self.format_line(event)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line).map_err(|e| PipelineError::sink_write("console", e.to_string()))
    }

    async fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| PipelineError::sink_write("console", e.to_string()))
    }
}
