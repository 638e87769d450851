/*!
 * Object probing: metadata size lookup plus streamed MD5
 *
 * A probe performs two remote operations against one reference: a
 * metadata lookup for the byte size, then a full sequential read of the
 * body through the digest accumulator. The two are independent causes of
 * failure and are reported with distinct kinds.
 */

use crate::digest::StreamingHasher;
use crate::input::ObjectRef;
use crate::store::{ObjectStore, StoreResult};
use std::fmt;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Read buffer for streaming object bodies into the hasher
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Coarse classification of a per-reference failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input line does not match the required reference form
    Validation,
    /// The store could not be asked for the object's size
    MetadataProbe,
    /// The object body could not be fully read
    StreamRead,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::MetadataProbe => write!(f, "metadata-probe"),
            FailureKind::StreamRead => write!(f, "stream-read"),
        }
    }
}

/// Terminal failure record for one input line
#[derive(Debug, Clone)]
pub struct Failure {
    /// 1-based input line number
    pub line_number: usize,
    /// The reference string as given (raw line for validation failures)
    pub uri: String,
    pub kind: FailureKind,
    /// Human-readable underlying cause
    pub cause: String,
}

impl Failure {
    /// Failure for a line rejected before any network activity
    pub fn validation(line_number: usize, raw: &str, cause: impl Into<String>) -> Self {
        Self {
            line_number,
            uri: raw.to_string(),
            kind: FailureKind::Validation,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} ({}): {} error: {}",
            self.line_number, self.uri, self.kind, self.cause
        )
    }
}

/// Successful probe of one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSuccess {
    pub line_number: usize,
    /// Normalized `s3://bucket/key` reference
    pub uri: String,
    /// Final path segment of the object key
    pub file_name: String,
    /// Byte length as reported by the store's metadata
    pub size: u64,
    /// Lowercase hex MD5 over the full byte stream
    pub md5: String,
}

/// Terminal outcome of probing one reference
#[derive(Debug, Clone)]
pub enum ProbeResult {
    Success(ProbeSuccess),
    Failure(Failure),
}

impl ProbeResult {
    pub fn line_number(&self) -> usize {
        match self {
            ProbeResult::Success(s) => s.line_number,
            ProbeResult::Failure(f) => f.line_number,
        }
    }
}

/// Probe one validated reference to a single terminal result.
///
/// Never returns early with a partial digest: a body read that stops
/// before the metadata-reported length is a stream-read failure.
pub async fn probe_object(store: &dyn ObjectStore, object: &ObjectRef) -> ProbeResult {
    let size = match fetch_size(store, object).await {
        Ok(size) => size,
        Err(e) => {
            return ProbeResult::Failure(Failure {
                line_number: object.line_number,
                uri: object.uri.clone(),
                kind: FailureKind::MetadataProbe,
                cause: e.to_string(),
            });
        }
    };

    let md5 = match stream_md5(store, object, size).await {
        Ok(md5) => md5,
        Err(cause) => {
            return ProbeResult::Failure(Failure {
                line_number: object.line_number,
                uri: object.uri.clone(),
                kind: FailureKind::StreamRead,
                cause,
            });
        }
    };

    debug!(uri = %object.uri, size, %md5, "probed object");

    ProbeResult::Success(ProbeSuccess {
        line_number: object.line_number,
        uri: object.uri.clone(),
        file_name: object.file_name().to_string(),
        size,
        md5,
    })
}

/// Metadata probe with one internal retry of a retryable fault. The
/// result is still a single terminal outcome per reference.
async fn fetch_size(store: &dyn ObjectStore, object: &ObjectRef) -> StoreResult<u64> {
    match store.object_size(&object.bucket, &object.key).await {
        Ok(size) => Ok(size),
        Err(e) if e.is_retryable() => {
            debug!(uri = %object.uri, error = %e, "retrying metadata probe");
            store.object_size(&object.bucket, &object.key).await
        }
        Err(e) => Err(e),
    }
}

/// Stream the full body through the MD5 accumulator.
async fn stream_md5(
    store: &dyn ObjectStore,
    object: &ObjectRef,
    expected_size: u64,
) -> std::result::Result<String, String> {
    let mut reader = store
        .reader(&object.bucket, &object.key)
        .await
        .map_err(|e| e.to_string())?;

    let mut hasher = StreamingHasher::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut streamed: u64 = 0;

    loop {
        let n = reader.read(&mut buffer).await.map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        streamed += n as u64;
    }

    if streamed != expected_size {
        return Err(format!(
            "truncated body: read {} of {} bytes",
            streamed, expected_size
        ));
    }

    Ok(hasher.finalize_hex())
}
