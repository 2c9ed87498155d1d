//! Event types

use super::enricher::Enricher;
use super::template;
use crate::core::context::{PropertyBag, ScopedContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Event severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(alias = "trace", alias = "Verbose", alias = "verbose")]
    Trace,
    #[serde(alias = "debug")]
    Debug,
    #[serde(alias = "information", alias = "info", alias = "Info")]
    Information,
    #[serde(alias = "warning", alias = "warn", alias = "Warn")]
    Warning,
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "fatal", alias = "critical", alias = "Critical")]
    Fatal,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }

    /// Three-letter form used by the console sink
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Trace => "TRC",
            Self::Debug => "DBG",
            Self::Information => "INF",
            Self::Warning => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" | "verbose" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" | "critical" => Ok(Self::Fatal),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

/// Structured error attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionDetails {
    pub type_name: String,
    pub message: String,
    pub stack_trace: Option<String>,
}

impl ExceptionDetails {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            stack_trace: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Capture an error value, recording its `source()` chain as the trace text
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        Self {
            type_name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            stack_trace: (!chain.is_empty()).then(|| chain.join("\n")),
        }
    }
}

impl fmt::Display for ExceptionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        if let Some(trace) = &self.stack_trace {
            write!(f, "\n{}", trace)?;
        }
        Ok(())
    }
}

/// Immutable log event, frozen at the moment it was emitted
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    message_template: String,
    properties: PropertyBag,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<ExceptionDetails>,
}

impl LogEvent {
    /// Freeze an event from the current context
    ///
    /// Rendered properties are the enricher's fields, then explicit fields,
    /// then the flattened context. Explicit fields win over context on a name
    /// collision; names owned by the enricher cannot be overridden by either.
    pub fn capture(
        level: LogLevel,
        message_template: impl Into<String>,
        explicit_fields: &PropertyBag,
        context: &ScopedContext,
        enricher: &Enricher,
        exception: Option<ExceptionDetails>,
    ) -> Self {
        let ambient = context.current_snapshot();
        let combined = explicit_fields.merged_over(&ambient);

        Self {
            timestamp: Utc::now(),
            level,
            message_template: message_template.into(),
            properties: enricher.enrich(&combined),
            exception,
        }
    }

    /// Build an event from already-rendered parts
    pub fn from_parts(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        message_template: impl Into<String>,
        properties: PropertyBag,
        exception: Option<ExceptionDetails>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message_template: message_template.into(),
            properties,
            exception,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn exception(&self) -> Option<&ExceptionDetails> {
        self.exception.as_ref()
    }

    /// Message with placeholders substituted from the event's properties
    pub fn render_message(&self) -> String {
        template::render(&self.message_template, &self.properties)
    }
}
