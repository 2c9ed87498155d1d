//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! - `trait_def`: Core Validate trait definition
//! - `pipeline_validators`: PipelineConfig and ServerConfig validators
//! - `sink_validators`: Sink descriptor validators
//! - `tests`: Test suite for all validators

mod pipeline_validators;
mod sink_validators;
mod trait_def;

pub use trait_def::Validate;
