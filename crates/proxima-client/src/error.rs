use std::time::Duration;

/// Client-specific result type
pub type Result<T> = std::result::Result<T, ProximaError>;

/// Errors from the Proxima client
#[derive(Debug, thiserror::Error)]
pub enum ProximaError {
    /// The server could not be reached
    #[error(
        "cannot connect to Proxima at {base_url}: is the Proxima app running? \
         (attempt {attempt}/{max_attempts}): {detail}"
    )]
    ConnectionFailure {
        /// Configured base URL
        base_url: String,
        /// 1-indexed attempt that produced this error
        attempt: u32,
        /// Attempt bound for the call
        max_attempts: u32,
        /// Transport-level detail
        detail: String,
    },

    /// The request exceeded its deadline
    #[error(
        "request to {endpoint} timed out after {timeout:?}: the AI provider may be slow \
         (attempt {attempt}/{max_attempts})"
    )]
    Timeout {
        /// Endpoint path
        endpoint: String,
        /// Per-attempt deadline
        timeout: Duration,
        /// 1-indexed attempt that produced this error
        attempt: u32,
        /// Attempt bound for the call
        max_attempts: u32,
    },

    /// Any other transport fault, never retried
    #[error("request failed: {0}")]
    Transport(String),

    /// Server answered with a non-200 status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from `error.message`, or a generic status message
        message: String,
    },

    /// Response body was not valid JSON
    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// A caller-supplied parameter cannot be represented as JSON
    #[error("parameter '{key}' cannot be sent as JSON: {source}")]
    InvalidParameter {
        /// Wire key of the rejected parameter
        key: String,
        /// Serialization failure
        source: serde_json::Error,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProximaError {
    /// Whether the dispatcher may retry after this error
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailure { .. } | Self::Timeout { .. })
    }

    /// HTTP status for API errors
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
