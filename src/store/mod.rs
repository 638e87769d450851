/*!
 * Object-store read interface
 *
 * The probe pipeline only ever needs two operations against the store,
 * both addressed by (bucket, key): a metadata lookup for the byte size
 * and a sequential read of the full body. The trait keeps the pipeline
 * testable against an in-memory double.
 */

mod error;
pub mod mock;
mod s3;

pub use error::{StoreError, StoreResult};
pub use mock::MockStore;
pub use s3::{S3Store, S3StoreConfig};

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Read-only object storage, as consumed by the probe pipeline
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Byte length of the object as reported by the store's metadata
    async fn object_size(&self, bucket: &str, key: &str) -> StoreResult<u64>;

    /// Sequential reader over the full object body
    async fn reader(
        &self,
        bucket: &str,
        key: &str,
    ) -> StoreResult<Box<dyn AsyncRead + Unpin + Send>>;
}
