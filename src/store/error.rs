//! Error types for object-store operations

use std::io;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading from the object store
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Object not found in bucket
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Access denied error
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    Sdk(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Check if the error is worth one retry
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Network(_) | StoreError::Timeout(_) | StoreError::Io(_) => true,
            // SDK errors: check for network-related strings
            StoreError::Sdk(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("connection reset")
                    || lower.contains("connection timed out")
                    || lower.contains("broken pipe")
                    || lower.contains("connection refused")
                    || lower.contains("temporarily unavailable")
            }
            StoreError::NotFound { .. }
            | StoreError::AccessDenied(_)
            | StoreError::InvalidConfig(_) => false,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Convert AWS SDK errors to StoreError
impl<E> From<aws_sdk_s3::error::SdkError<E>> for StoreError
where
    E: std::error::Error + 'static,
{
    fn from(error: aws_sdk_s3::error::SdkError<E>) -> Self {
        match error {
            aws_sdk_s3::error::SdkError::TimeoutError(e) => {
                StoreError::Timeout(format!("{:?}", e))
            }
            aws_sdk_s3::error::SdkError::DispatchFailure(e) => {
                StoreError::Network(format!("Network dispatch failure: {:?}", e))
            }
            aws_sdk_s3::error::SdkError::ResponseError(e) => {
                StoreError::Network(format!("Response error: {:?}", e))
            }
            _ => StoreError::Sdk(format!("{:?}", error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(StoreError::Network("connection lost".to_string()).is_retryable());
        assert!(StoreError::Timeout("30s elapsed".to_string()).is_retryable());
        assert!(StoreError::Io("read failed".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!StoreError::NotFound {
            bucket: "bkt".to_string(),
            key: "key".to_string(),
        }
        .is_retryable());
        assert!(!StoreError::AccessDenied("no perms".to_string()).is_retryable());
        assert!(!StoreError::InvalidConfig("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_sdk_network_errors_retryable() {
        assert!(StoreError::Sdk("connection reset by peer".to_string()).is_retryable());
        assert!(StoreError::Sdk("Connection timed out".to_string()).is_retryable());
        assert!(StoreError::Sdk("broken pipe".to_string()).is_retryable());
        assert!(!StoreError::Sdk("invalid argument".to_string()).is_retryable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound {
            bucket: "my-bucket".to_string(),
            key: "my-key".to_string(),
        };
        assert_eq!(err.to_string(), "Object not found: my-bucket/my-key");

        let err = StoreError::Network("connection lost".to_string());
        assert_eq!(err.to_string(), "Network error: connection lost");

        let err = StoreError::AccessDenied("no perms".to_string());
        assert_eq!(err.to_string(), "Access denied: no perms");
    }
}
