//! Integration tests for scopelog
//!
//! These tests drive the public pipeline API together with real sinks.

pub mod concurrency_tests;
pub mod config_tests;
pub mod database_sink_tests;
pub mod middleware_tests;
pub mod pipeline_tests;
