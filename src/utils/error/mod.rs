//! Error handling utilities
//!
//! This module provides the pipeline error type and the retry policy used by sinks.

pub mod error;
pub mod recovery;

// Re-export commonly used types
pub use error::*;
pub use recovery::*;
