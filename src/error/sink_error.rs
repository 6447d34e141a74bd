use thiserror::Error;

/// Error raised while dispatching a log event to a notification provider.
///
/// Every variant except [`SinkError::InvalidArgument`] is an operational
/// failure and is subject to the sink's `suppress_errors` policy.
/// `InvalidArgument` signals a programming error and always reaches the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// A required argument was not supplied to the dispatch call
    #[error("Invalid argument: {name} must not be empty")]
    InvalidArgument { name: &'static str },

    /// A required sink setting is missing or unusable
    #[error("Configuration error in {sink} sink: {field} - {reason}")]
    Configuration {
        sink: &'static str,
        field: &'static str,
        reason: String,
    },

    /// The provider answered with a status other than 200 OK
    #[error("Error response code from {provider}. Code: {status}.")]
    Transport { provider: &'static str, status: u16 },

    /// The provider answered 200 OK but reported a logical failure
    #[error("Error returned from {provider} API: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The request could not be completed at all (connection, DNS, timeout)
    #[error("Request to {provider} failed: {message}")]
    Request {
        provider: &'static str,
        message: String,
    },
}

/// Discriminant of [`SinkError`], useful for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    InvalidArgument,
    Configuration,
    Transport,
    Provider,
    Request,
}

impl SinkError {
    pub fn invalid_argument(name: &'static str) -> Self {
        Self::InvalidArgument { name }
    }

    pub fn configuration(sink: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            sink,
            field,
            reason: reason.into(),
        }
    }

    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    pub fn request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Request {
            provider,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> SinkErrorKind {
        match self {
            SinkError::InvalidArgument { .. } => SinkErrorKind::InvalidArgument,
            SinkError::Configuration { .. } => SinkErrorKind::Configuration,
            SinkError::Transport { .. } => SinkErrorKind::Transport,
            SinkError::Provider { .. } => SinkErrorKind::Provider,
            SinkError::Request { .. } => SinkErrorKind::Request,
        }
    }

    /// Whether the failure policy is allowed to swallow this error.
    pub fn is_suppressible(&self) -> bool {
        !matches!(self, SinkError::InvalidArgument { .. })
    }
}

/// Type alias for Result with SinkError
pub type SinkResult<T> = Result<T, SinkError>;
