//! # scopelog
//!
//! Contextual structured logging for request-serving applications.
//!
//! ## Features
//!
//! - **Scoped context**: per-request stacks of property frames, released on every exit path
//! - **Enrichment**: service identity stamped on every event and never overridden
//! - **Non-blocking fan-out**: one bounded queue and worker per sink, failures isolated
//! - **Relational sink**: fixed typed columns plus a JSON overflow column
//! - **actix-web middleware**: request timing, correlation ids and completion events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scopelog::config::PipelineConfig;
//! use scopelog::core::context::PropertyBag;
//! use scopelog::core::event::LogLevel;
//! use scopelog::core::{LoggingPipeline, RequestMetadata, RequestOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = LoggingPipeline::from_config(PipelineConfig::default()).await?;
//!
//!     let scope = pipeline.begin_request_scope(RequestMetadata::new("/checkout"));
//!     pipeline.emit(
//!         scope.context(),
//!         LogLevel::Information,
//!         "Order {OrderId} placed",
//!         PropertyBag::new().with("OrderId", 42),
//!     );
//!     pipeline.end_request_scope(scope, RequestOutcome::Completed { status_code: 200 });
//!
//!     pipeline.shutdown().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::LoggingPipeline;
pub use utils::error::{PipelineError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
