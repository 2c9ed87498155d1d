//! Common test utilities for scopelog
//!
//! - In-memory SQLite sinks
//! - Pipeline fixtures
//! - Event assertions
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{database, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let store = database::TestDatabase::new().await;
//!     let (pipeline, console) = fixtures::pipeline_with_store(&store);
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod database;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::EventAssertions;
pub use database::TestDatabase;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
