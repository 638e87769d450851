/*!
 * Error types and process exit codes
 */

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RUN_FAILED: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

/// Errors that can abort a manifest run
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Input file does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input file contained no object references
    #[error("No S3 URIs found in input file: {0}")]
    NoReferences(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error reading input or writing the manifest
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// One or more references failed; nothing was written
    #[error("{failed} of {total} references failed; manifest not written")]
    RunFailed { failed: usize, total: usize },
}

impl ManifestError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ManifestError::RunFailed { .. } => EXIT_RUN_FAILED,
            ManifestError::InputNotFound(_)
            | ManifestError::NoReferences(_)
            | ManifestError::Config(_)
            | ManifestError::Io(_) => EXIT_FATAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(EXIT_SUCCESS, 0);
        assert_eq!(EXIT_RUN_FAILED, 1);
        assert_eq!(EXIT_FATAL, 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ManifestError::InputNotFound(PathBuf::from("/missing.txt")).exit_code(),
            EXIT_FATAL
        );
        assert_eq!(
            ManifestError::NoReferences(PathBuf::from("/empty.txt")).exit_code(),
            EXIT_FATAL
        );
        assert_eq!(
            ManifestError::Config("workers must be >= 1".to_string()).exit_code(),
            EXIT_FATAL
        );
        assert_eq!(
            ManifestError::Io(io::Error::other("disk full")).exit_code(),
            EXIT_FATAL
        );
        assert_eq!(
            ManifestError::RunFailed {
                failed: 2,
                total: 5
            }
            .exit_code(),
            EXIT_RUN_FAILED
        );
    }

    #[test]
    fn test_error_display() {
        let err = ManifestError::InputNotFound(PathBuf::from("/tmp/uris.txt"));
        assert!(err.to_string().contains("Input file not found"));
        assert!(err.to_string().contains("uris.txt"));

        let err = ManifestError::RunFailed {
            failed: 1,
            total: 4,
        };
        assert_eq!(
            err.to_string(),
            "1 of 4 references failed; manifest not written"
        );

        let err = ManifestError::Config("bad flag".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad flag");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: ManifestError = io_err.into();
        assert!(matches!(err, ManifestError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }
}
