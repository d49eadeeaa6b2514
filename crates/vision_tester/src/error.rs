//! Error types for the inference client and its supporting modules

use thiserror::Error;

/// Failure of a single call against the inference server
///
/// Every variant is terminal for the call that produced it; the client never
/// retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport never completed (DNS, connect, timeout)
    #[error("{description}")]
    Unreachable { description: String },

    /// Transport completed but the server answered with a non-200 status
    #[error("HTTP {status} - {body}")]
    ServerRejected { status: u16, body: String },

    /// Status 200 but the body did not have the expected JSON shape
    #[error("Invalid response from server: {description}")]
    ProtocolViolation { description: String },
}

impl ClientError {
    /// Text shown to the user in place of a model response
    ///
    /// `ServerRejected` renders as `Error: HTTP {status} - {body}` and
    /// `Unreachable` as `Error: {description}`.
    pub fn user_message(&self) -> String {
        format!("Error: {}", self)
    }

    /// Returns true if the server was never reached
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let description = if e.is_timeout() {
            format!("Request timed out: {}", e)
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else {
            e.to_string()
        };
        ClientError::Unreachable { description }
    }
}

/// Rejected server base URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("Invalid endpoint URL '{input}': {reason}")]
    Invalid { input: String, reason: String },

    #[error("Unsupported endpoint scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Failure while loading or encoding an image
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while persisting a test report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_rejected_user_message() {
        let err = ClientError::ServerRejected {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.user_message(), "Error: HTTP 500 - oops");
    }

    #[test]
    fn test_unreachable_user_message() {
        let err = ClientError::Unreachable {
            description: "connection refused".to_string(),
        };
        assert_eq!(err.user_message(), "Error: connection refused");
        assert!(err.is_unreachable());
    }
}
