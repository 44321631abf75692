//! Error types for client operations.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Status code reported for requests that never reached the daemon.
pub const STATUS_UNREACHABLE: u16 = 0;

/// Status code reported for requests that exceeded the configured timeout.
pub const STATUS_TIMEOUT: u16 = 408;

/// Errors that can occur during client operations.
///
/// The three variants are mutually exclusive: `Connection` is only raised by
/// the reachability probe during setup, `Api` covers every failure of a
/// dispatched request (including timeouts and refused connections), and
/// `Validation` covers caller-input problems detected before the primary
/// request is sent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The daemon did not answer the setup health probe.
    #[error("cannot connect to skiff daemon at {base_url}")]
    Connection {
        /// Base address that was probed.
        base_url: String,
    },

    /// The daemon reported an error, or the request failed in transit.
    ///
    /// `status` is the HTTP status from the response, [`STATUS_TIMEOUT`] for
    /// a request that exceeded the configured timeout, or
    /// [`STATUS_UNREACHABLE`] for a connection-level failure.
    #[error("{operation} failed (status {status}): {message}")]
    Api {
        /// Logical operation that failed (e.g. "container create").
        operation: &'static str,
        /// Status code, see above.
        status: u16,
        /// Service-supplied error string, or a transport description.
        message: String,
        /// Optional service-supplied detail string.
        detail: Option<String>,
    },

    /// Caller input was invalid; no primary request was attempted.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl ClientError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns the status code if this is an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a timeout failure.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.status() == Some(STATUS_TIMEOUT)
    }

    /// Returns true if the daemon reported a 404 for the requested resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            operation: "container create",
            status: 500,
            message: "image store unavailable".to_string(),
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "container create failed (status 500): image store unavailable"
        );
    }

    #[test]
    fn test_timeout_classification() {
        let err = ClientError::Api {
            operation: "container exec",
            status: STATUS_TIMEOUT,
            message: "request timed out".to_string(),
            detail: None,
        };
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unreachable_distinct_from_timeout() {
        let err = ClientError::Api {
            operation: "container exec",
            status: STATUS_UNREACHABLE,
            message: "connection refused".to_string(),
            detail: None,
        };
        assert!(!err.is_timeout());
        assert_eq!(err.status(), Some(0));
    }

    #[test]
    fn test_validation_error() {
        let err = ClientError::validation("exec requires a command or script");
        assert!(err.is_validation());
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "invalid request: exec requires a command or script"
        );
    }

    #[test]
    fn test_connection_error_names_address() {
        let err = ClientError::Connection {
            base_url: "http://127.0.0.1:7070".to_string(),
        };
        assert!(err.to_string().contains("http://127.0.0.1:7070"));
    }
}
