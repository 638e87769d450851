//! Fixed-schema manifest rows

use crate::probe::ProbeSuccess;

/// Header names, in output order. The schema is fixed by the bulk
/// registration step that consumes the manifest.
pub const MANIFEST_COLUMNS: [&str; 7] = ["guid", "file_name", "md5", "size", "acl", "authz", "urls"];

/// Access-control value stamped on every row
pub const DEFAULT_ACL: &str = "*";

/// One output row of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// Always empty at generation time; assigned later by the index
    pub guid: String,
    pub file_name: String,
    pub md5: String,
    pub size: u64,
    pub acl: String,
    pub authz: String,
    pub urls: String,
}

impl ManifestRow {
    /// Project a successful probe into a row. The authz scope is the
    /// same operator-supplied value for every row in a run.
    pub fn from_probe(probe: ProbeSuccess, authz: &str) -> Self {
        Self {
            guid: String::new(),
            file_name: probe.file_name,
            md5: probe.md5,
            size: probe.size,
            acl: DEFAULT_ACL.to_string(),
            authz: authz.to_string(),
            urls: probe.uri,
        }
    }

    /// Render the row as one tab-separated line, fields verbatim
    pub fn to_tsv_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.guid, self.file_name, self.md5, self.size, self.acl, self.authz, self.urls
        )
    }
}
