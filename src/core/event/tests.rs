//! Tests for event capture

#[cfg(test)]
mod tests {
    use super::super::{Enricher, ExceptionDetails, LogEvent, LogLevel, well_known};
    use crate::core::context::{PropertyBag, PropertyValue, ScopedContext};

    fn enricher() -> Enricher {
        Enricher::new("orders", "Staging", "host-a")
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Information);
        assert!(LogLevel::Information < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("info".parse::<LogLevel>(), Ok(LogLevel::Information));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("critical".parse::<LogLevel>(), Ok(LogLevel::Fatal));
        assert!("loud".parse::<LogLevel>().is_err());

        let level: LogLevel = serde_yaml::from_str("warn").unwrap();
        assert_eq!(level, LogLevel::Warning);
    }

    #[test]
    fn test_capture_explicit_fields_win_over_context() {
        let context = ScopedContext::new();
        let _frame = context.push(
            PropertyBag::new()
                .with(well_known::OPERATION_NAME, "UnknownOperation")
                .with(well_known::REQUEST_ID, "r-1"),
        );

        let explicit = PropertyBag::new().with(well_known::OPERATION_NAME, "Refund");
        let event = LogEvent::capture(
            LogLevel::Information,
            "Running {OperationName}",
            &explicit,
            &context,
            &enricher(),
            None,
        );

        assert_eq!(
            event.properties().get(well_known::OPERATION_NAME).and_then(|v| v.as_str()),
            Some("Refund")
        );
        assert_eq!(
            event.properties().get(well_known::REQUEST_ID).and_then(|v| v.as_str()),
            Some("r-1")
        );
        assert_eq!(event.render_message(), "Running Refund");
    }

    #[test]
    fn test_capture_always_carries_identity() {
        let context = ScopedContext::new();
        let explicit = PropertyBag::new().with(well_known::SERVICE_NAME, "other");
        let event = LogEvent::capture(
            LogLevel::Debug,
            "x",
            &explicit,
            &context,
            &enricher(),
            None,
        );

        assert_eq!(
            event.properties().get(well_known::SERVICE_NAME),
            Some(&PropertyValue::String("orders".into()))
        );
        assert!(event.properties().contains(well_known::ENVIRONMENT));
    }

    #[test]
    fn test_event_not_affected_by_later_context_changes() {
        let context = ScopedContext::new();
        let mut frame = context.push(PropertyBag::new().with("Step", "one"));
        let event = LogEvent::capture(
            LogLevel::Information,
            "step {Step}",
            &PropertyBag::new(),
            &context,
            &enricher(),
            None,
        );
        frame.release();
        let _next = context.push(PropertyBag::new().with("Step", "two"));

        assert_eq!(event.render_message(), "step one");
    }

    #[test]
    fn test_exception_from_error_chain() {
        let inner = std::io::Error::other("disk full");
        let outer = crate::utils::error::PipelineError::Io(inner);
        let details = ExceptionDetails::from_error(&outer);

        assert!(details.type_name.ends_with("PipelineError"));
        assert_eq!(details.message, "IO error: disk full");
        assert_eq!(details.stack_trace.as_deref(), Some("caused by: disk full"));
    }

    #[test]
    fn test_event_serializes_to_json() {
        let context = ScopedContext::new();
        let event = LogEvent::capture(
            LogLevel::Warning,
            "low stock for {Sku}",
            &PropertyBag::new().with("Sku", "A-1"),
            &context,
            &enricher(),
            Some(ExceptionDetails::new("StockError", "only 1 left")),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "Warning");
        assert_eq!(json["message_template"], "low stock for {Sku}");
        assert_eq!(json["properties"]["Sku"], "A-1");
        assert_eq!(json["exception"]["type_name"], "StockError");
    }
}
