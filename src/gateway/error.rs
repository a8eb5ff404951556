//! Error types for gateway operations.

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error type for calls to the computation backend.
///
/// The `Display` form of these variants is the single human-readable
/// message sessions surface on a failed computation, so every variant
/// renders with enough context to stand on its own.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status.
    #[error("API {endpoint} {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The backend could not be reached or the connection broke.
    #[error("API {endpoint} unreachable: {message}")]
    Transport { endpoint: String, message: String },

    /// The backend answered 2xx but the body did not parse.
    #[error("API {endpoint} returned an unreadable body: {message}")]
    Decode { endpoint: String, message: String },

    /// The gateway itself is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GatewayError {
    /// Create a status error from a response body.
    pub fn status(endpoint: impl Into<String>, status: u16, body: impl AsRef<str>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body: body.as_ref().trim().to_string(),
        }
    }

    /// Create a transport error.
    pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error.
    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { .. } => true,
            GatewayError::Status { status, .. } => *status >= 500,
            GatewayError::Decode { .. } | GatewayError::Configuration { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = GatewayError::status("/computation", 500, "  boom \n");
        assert_eq!(err.to_string(), "API /computation 500: boom");
    }

    #[test]
    fn test_transport_error_display() {
        let err = GatewayError::transport("/poi-lookup", "connection refused");
        assert_eq!(
            err.to_string(),
            "API /poi-lookup unreachable: connection refused"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(GatewayError::transport("/computation", "reset").is_retryable());
        assert!(GatewayError::status("/computation", 503, "busy").is_retryable());
        assert!(!GatewayError::status("/computation", 404, "missing").is_retryable());
        assert!(!GatewayError::decode("/computation", "bad json").is_retryable());
        assert!(!GatewayError::configuration("no base url").is_retryable());
    }
}
