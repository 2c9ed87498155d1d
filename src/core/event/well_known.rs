//! Well-known property names
//!
//! These match the fixed columns of the relational sink, so a property with
//! one of these names lands in its own column instead of the overflow blob.

pub const CORRELATION_ID: &str = "CorrelationId";
pub const REQUEST_ID: &str = "RequestId";
pub const USER_ID: &str = "UserId";
pub const SERVICE_NAME: &str = "ServiceName";
pub const ENVIRONMENT: &str = "Environment";
pub const MACHINE_NAME: &str = "MachineName";
pub const REQUEST_PATH: &str = "RequestPath";
pub const REQUEST_METHOD: &str = "RequestMethod";
pub const CLIENT_IP: &str = "ClientIP";
pub const USER_AGENT: &str = "UserAgent";
pub const OPERATION_NAME: &str = "OperationName";
pub const EXECUTION_TIME_MS: &str = "ExecutionTimeMs";
pub const STATUS_CODE: &str = "StatusCode";
pub const SOURCE_CONTEXT: &str = "SourceContext";
/// How a request ended: `Completed`, `Failed` or `Cancelled`
pub const OUTCOME: &str = "Outcome";

/// Placeholder user for unauthenticated requests
pub const ANONYMOUS_USER: &str = "Anonymous";
/// Placeholder for a client address that could not be determined
pub const UNKNOWN_CLIENT: &str = "Unknown";
