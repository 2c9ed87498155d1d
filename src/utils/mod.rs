//! Utility modules
//!
//! - **error**: Error types and retry handling
//! - **logging**: Diagnostic output of the pipeline itself

pub mod error;
pub mod logging;
