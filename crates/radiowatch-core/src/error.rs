//! Error types for Radiowatch core.

use thiserror::Error;

/// Failures surfaced by device API operations.
///
/// Every transport operation resolves to one of these kinds, so callers
/// can report them uniformly without inspecting HTTP internals.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The device answered with a status code other than the expected one.
    /// The message carries the server-provided detail.
    #[error("{0}")]
    Api(String),

    /// The device could not be reached, or the connection dropped mid-body.
    #[error("Failed to connect to {host}: {message}")]
    Connection { host: String, message: String },

    /// The device answered, but the body was not parseable.
    #[error("{0}")]
    Parse(String),

    /// A local write failed while streaming a download.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = ClientError::Connection {
            host: "http://10.0.0.1:8080".to_string(),
            message: "connection refused".to_string(),
        };
        let text = format!("{}", err);
        assert!(text.contains("http://10.0.0.1:8080"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api("Server returned 500: boom".to_string());
        assert_eq!(format!("{}", err), "Server returned 500: boom");
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: ClientError = io.into();
        assert!(format!("{}", err).contains("disk full"));
    }
}
