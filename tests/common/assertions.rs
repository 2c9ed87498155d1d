//! Custom test assertions
//!
//! Provides domain-specific assertions for log events.

use scopelog::core::event::LogEvent;

/// Assertions for LogEvent
pub trait EventAssertions {
    /// String property value, panicking when absent or not a string
    fn text(&self, name: &str) -> &str;

    /// Integer property value, panicking when absent or not an integer
    fn integer(&self, name: &str) -> i64;

    /// Assert the service identity fields are present
    fn assert_identity(&self);
}

impl EventAssertions for LogEvent {
    fn text(&self, name: &str) -> &str {
        self.properties()
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("Expected string property {}", name))
    }

    fn integer(&self, name: &str) -> i64 {
        self.properties()
            .get(name)
            .and_then(|v| v.as_i64())
            .unwrap_or_else(|| panic!("Expected integer property {}", name))
    }

    fn assert_identity(&self) {
        for name in ["ServiceName", "Environment", "MachineName"] {
            assert!(
                self.properties().contains(name),
                "Expected identity field {} on every event",
                name
            );
        }
    }
}
