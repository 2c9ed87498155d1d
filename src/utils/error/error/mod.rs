//! Error handling for the logging pipeline
//!
//! This module defines all error types used throughout the pipeline.

mod helpers;
mod types;

pub use types::{PipelineError, Result};
