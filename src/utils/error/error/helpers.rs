//! Helper functions for creating specific error types

use super::types::PipelineError;

impl PipelineError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn sink_write<N: Into<String>, S: Into<String>>(sink: N, message: S) -> Self {
        Self::SinkWrite {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn context_imbalance<S: Into<String>>(message: S) -> Self {
        Self::ContextImbalance(message.into())
    }

    pub fn queue_overflow<S: Into<String>>(sink: S) -> Self {
        Self::QueueOverflow { sink: sink.into() }
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SinkWrite { .. } | Self::Database(_) | Self::Io(_)
        )
    }
}
