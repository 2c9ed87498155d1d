//! Request metadata and outcomes

use crate::core::event::ExceptionDetails;

/// What the web layer knows about a request when it arrives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMetadata {
    pub method: Option<String>,
    pub path: String,
    /// Authenticated user, if any
    pub user_id: Option<String>,
    pub client_address: Option<String>,
    pub user_agent: Option<String>,
    /// Correlation id received from an upstream caller
    pub correlation_id: Option<String>,
    /// Operation name known at entry; handlers usually narrow it later
    pub operation_name: Option<String>,
}

impl RequestMetadata {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_client_address(mut self, address: impl Into<String>) -> Self {
        self.client_address = Some(address.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }
}

/// How a request ended
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// A response was produced
    Completed { status_code: u16 },
    /// The handler failed
    Failed {
        status_code: Option<u16>,
        error: ExceptionDetails,
    },
    /// The request was abandoned before finishing
    Cancelled,
}

impl RequestOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "Completed",
            Self::Failed { .. } => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Completed { status_code } => Some(*status_code),
            Self::Failed { status_code, .. } => *status_code,
            Self::Cancelled => None,
        }
    }

    pub(crate) fn message_template(&self, has_method: bool) -> &'static str {
        match (self, has_method) {
            (Self::Completed { .. }, true) => {
                "HTTP {RequestMethod} {RequestPath} responded {StatusCode} in {ExecutionTimeMs} ms"
            }
            (Self::Completed { .. }, false) => {
                "Request {RequestPath} responded {StatusCode} in {ExecutionTimeMs} ms"
            }
            (Self::Failed { .. }, true) => {
                "HTTP {RequestMethod} {RequestPath} failed in {ExecutionTimeMs} ms"
            }
            (Self::Failed { .. }, false) => "Request {RequestPath} failed in {ExecutionTimeMs} ms",
            (Self::Cancelled, true) => {
                "HTTP {RequestMethod} {RequestPath} cancelled after {ExecutionTimeMs} ms"
            }
            (Self::Cancelled, false) => "Request {RequestPath} cancelled after {ExecutionTimeMs} ms",
        }
    }
}

/// Timer state of a request scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No frame pushed, clock stopped
    Idle,
    /// Frame pushed, clock running
    Active,
}
