/*!
 * Input parsing and validation for object references
 *
 * Every line must match `s3://bucket/key` exactly, with a non-empty
 * bucket and key. Validation is purely syntactic and happens before any
 * network activity; a rejected line never reaches a prober but still
 * fails the run.
 */

use crate::error::{ManifestError, Result};
use crate::probe::Failure;
use std::path::Path;

const URI_SCHEME: &str = "s3://";

/// One validated input line: a (bucket, key) reference plus the context
/// needed for ordering and error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// 1-based line number in the input file
    pub line_number: usize,
    /// Normalized `s3://bucket/key` form
    pub uri: String,
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    /// File name for the manifest: the final path segment of the key.
    /// Trailing slashes are ignored, so `a/b/` names `b`; a key with no
    /// `/` is its own file name.
    pub fn file_name(&self) -> &str {
        let trimmed = self.key.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// Parse one non-empty input line into a reference
pub fn parse_object_uri(line: &str, line_number: usize) -> std::result::Result<ObjectRef, Failure> {
    let Some(rest) = line.strip_prefix(URI_SCHEME) else {
        return Err(Failure::validation(
            line_number,
            line,
            format!("malformed S3 URI, expected {}bucket/key", URI_SCHEME),
        ));
    };

    let Some((bucket, key)) = rest.split_once('/') else {
        return Err(Failure::validation(
            line_number,
            line,
            "missing object key",
        ));
    };

    if bucket.is_empty() {
        return Err(Failure::validation(line_number, line, "missing bucket name"));
    }

    let key = key.trim_start_matches('/');
    if key.is_empty() {
        return Err(Failure::validation(line_number, line, "missing object key"));
    }

    Ok(ObjectRef {
        line_number,
        uri: format!("{}{}/{}", URI_SCHEME, bucket, key),
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// Split the raw input text into validated references and immediate
/// rejections. Blank lines are skipped silently; when `skip_header` is
/// set, the first non-empty line is skipped once before any record is
/// evaluated.
pub fn load_references(text: &str, skip_header: bool) -> (Vec<ObjectRef>, Vec<Failure>) {
    let mut references = Vec::new();
    let mut rejections = Vec::new();
    let mut skipped_header = false;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if skip_header && !skipped_header {
            skipped_header = true;
            continue;
        }
        match parse_object_uri(line, index + 1) {
            Ok(reference) => references.push(reference),
            Err(failure) => rejections.push(failure),
        }
    }

    (references, rejections)
}

/// Read the input file, failing fast when it does not exist
pub fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ManifestError::InputNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
