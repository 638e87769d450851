/*!
 * indexd-manifest - manifest generation for indexd bulk registration
 *
 * Reads a file of S3 URIs, probes every object for its true byte size and
 * content MD5 (streamed, never trusting stored checksums), and writes the
 * fixed-schema TSV manifest consumed by a separate bulk index-load step.
 *
 * - Exact `s3://bucket/key` validation before any network activity
 * - Bounded concurrent probing with deterministic per-reference outcomes
 * - Output order always tracks input line order
 * - All-or-nothing output: the manifest is only written when every
 *   reference succeeded
 */

pub mod config;
pub mod digest;
pub mod error;
pub mod input;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod probe;
pub mod store;

// Re-export commonly used types
pub use config::{ManifestConfig, DEFAULT_WORKERS};
pub use error::{ManifestError, Result, EXIT_FATAL, EXIT_RUN_FAILED, EXIT_SUCCESS};
pub use input::ObjectRef;
pub use manifest::{ManifestRow, DEFAULT_ACL, MANIFEST_COLUMNS};
pub use pipeline::{generate_manifest, RunOutcome};
pub use probe::{Failure, FailureKind, ProbeResult, ProbeSuccess};
pub use store::{ObjectStore, S3Store, S3StoreConfig, StoreError, StoreResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
