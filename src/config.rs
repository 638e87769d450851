/*!
 * Run configuration
 *
 * One explicit, statically-typed structure built once from the CLI before
 * the pipeline starts. Every recognized option has a named field and a
 * documented default.
 */

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of parallel probe workers
pub const DEFAULT_WORKERS: usize = 4;

/// Configuration for one manifest generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Path to the text file containing one S3 URI per line
    pub input: PathBuf,

    /// Path where the manifest TSV will be written
    pub output: PathBuf,

    /// Authorization scope applied verbatim to every manifest row
    pub authz: String,

    /// Maximum number of objects probed concurrently (default: 4)
    pub workers: usize,

    /// AWS profile name (None = ambient credential chain)
    pub profile: Option<String>,

    /// AWS region override (None = default region resolution)
    pub region: Option<String>,

    /// Skip the first non-empty input line as a header (default: off)
    pub skip_header: bool,

    /// Enable debug logging
    pub verbose: bool,
}

impl ManifestConfig {
    /// Create a configuration with the required parameters and defaults
    /// for everything else
    pub fn new(input: PathBuf, output: PathBuf, authz: String) -> Self {
        Self {
            input,
            output,
            authz,
            workers: DEFAULT_WORKERS,
            profile: None,
            region: None,
            skip_header: false,
            verbose: false,
        }
    }

    /// Validate the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.workers < 1 {
            return Err(ManifestError::Config(
                "workers must be >= 1".to_string(),
            ));
        }
        if self.authz.is_empty() {
            return Err(ManifestError::Config(
                "authz must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self::new(PathBuf::new(), PathBuf::new(), String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ManifestConfig {
        ManifestConfig::new(
            PathBuf::from("uris.txt"),
            PathBuf::from("manifest.tsv"),
            "/programs/P/projects/X".to_string(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = valid_config();
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.profile, None);
        assert_eq!(config.region, None);
        assert!(!config.skip_header);
        assert!(!config.verbose);
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = valid_config();
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_authz() {
        let mut config = valid_config();
        config.authz = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_worker_is_valid() {
        let mut config = valid_config();
        config.workers = 1;
        assert!(config.validate().is_ok());
    }
}
