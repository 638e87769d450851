//! In-memory object store for tests
//!
//! Instrumented so tests can observe probe traffic: per-object injected
//! faults, artificial latency, and a high-water mark of concurrent body
//! reads for asserting the worker-pool bound.

use super::{ObjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};

#[derive(Debug, Clone, Default)]
struct MockObject {
    data: Vec<u8>,
    /// Overrides `data.len()` in the metadata reply when set
    reported_size: Option<u64>,
    head_error: Option<StoreError>,
    /// None = every head call fails; Some(n) = the next n head calls fail
    head_error_remaining: Option<usize>,
    /// Fail the body read once this many bytes have been served
    read_error_after: Option<usize>,
    /// Latency before the body opens
    delay: Duration,
}

/// In-memory object store double
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    objects: Arc<Mutex<HashMap<(String, String), MockObject>>>,
    head_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with the given content
    pub fn add_object(&self, bucket: &str, key: &str, data: &[u8]) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(
            (bucket.to_string(), key.to_string()),
            MockObject {
                data: data.to_vec(),
                ..Default::default()
            },
        );
    }

    fn with_object<F: FnOnce(&mut MockObject)>(&self, bucket: &str, key: &str, apply: F) {
        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(&(bucket.to_string(), key.to_string()))
            .expect("object must be added before configuring faults");
        apply(object);
    }

    /// Report a metadata size different from the actual body length
    pub fn set_reported_size(&self, bucket: &str, key: &str, size: u64) {
        self.with_object(bucket, key, |o| o.reported_size = Some(size));
    }

    /// Fail every metadata lookup for this object
    pub fn fail_head(&self, bucket: &str, key: &str, error: StoreError) {
        self.with_object(bucket, key, |o| {
            o.head_error = Some(error);
            o.head_error_remaining = None;
        });
    }

    /// Fail only the next metadata lookup for this object
    pub fn fail_head_once(&self, bucket: &str, key: &str, error: StoreError) {
        self.with_object(bucket, key, |o| {
            o.head_error = Some(error);
            o.head_error_remaining = Some(1);
        });
    }

    /// Fail the body read once `after_bytes` bytes have been served
    pub fn fail_read_after(&self, bucket: &str, key: &str, after_bytes: usize) {
        self.with_object(bucket, key, |o| o.read_error_after = Some(after_bytes));
    }

    /// Delay the body open by the given duration
    pub fn set_delay(&self, bucket: &str, key: &str, delay: Duration) {
        self.with_object(bucket, key, |o| o.delay = delay);
    }

    /// Number of metadata lookups served so far
    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    /// Number of body reads opened so far
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// High-water mark of concurrently open body reads
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, bucket: &str, key: &str) -> StoreResult<MockObject> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn object_size(&self, bucket: &str, key: &str) -> StoreResult<u64> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        if let Some(error) = &object.head_error {
            match object.head_error_remaining {
                None => return Err(error.clone()),
                Some(0) => {}
                Some(remaining) => {
                    let error = error.clone();
                    object.head_error_remaining = Some(remaining - 1);
                    return Err(error);
                }
            }
        }

        Ok(object
            .reported_size
            .unwrap_or(object.data.len() as u64))
    }

    async fn reader(
        &self,
        bucket: &str,
        key: &str,
    ) -> StoreResult<Box<dyn AsyncRead + Unpin + Send>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let object = self.lookup(bucket, key)?;

        if !object.delay.is_zero() {
            tokio::time::sleep(object.delay).await;
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        Ok(Box::new(MockReader {
            data: object.data,
            pos: 0,
            fail_after: object.read_error_after,
            in_flight: self.in_flight.clone(),
        }))
    }
}

/// Reader over an owned byte buffer, decrementing the in-flight counter
/// when the probe drops it.
struct MockReader {
    data: Vec<u8>,
    pos: usize,
    fail_after: Option<usize>,
    in_flight: Arc<AtomicUsize>,
}

impl AsyncRead for MockReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if let Some(limit) = this.fail_after {
            if this.pos >= limit {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "simulated mid-stream failure",
                )));
            }
        }

        if this.pos >= this.data.len() {
            return Poll::Ready(Ok(())); // EOF
        }

        let mut end = (this.pos + buf.remaining()).min(this.data.len());
        if let Some(limit) = this.fail_after {
            end = end.min(limit);
        }
        buf.put_slice(&this.data[this.pos..end]);
        this.pos = end;

        Poll::Ready(Ok(()))
    }
}

impl Drop for MockReader {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_size_and_read() {
        let store = MockStore::new();
        store.add_object("bkt", "key", b"payload");

        assert_eq!(store.object_size("bkt", "key").await.unwrap(), 7);

        let mut reader = store.reader("bkt", "key").await.unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"payload");
    }

    #[tokio::test]
    async fn test_missing_object() {
        let store = MockStore::new();
        assert!(matches!(
            store.object_size("bkt", "nope").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.reader("bkt", "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_reported_size_override() {
        let store = MockStore::new();
        store.add_object("bkt", "key", b"abc");
        store.set_reported_size("bkt", "key", 42);
        assert_eq!(store.object_size("bkt", "key").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_fail_head_once() {
        let store = MockStore::new();
        store.add_object("bkt", "key", b"abc");
        store.fail_head_once("bkt", "key", StoreError::Timeout("slow".to_string()));

        assert!(store.object_size("bkt", "key").await.is_err());
        assert_eq!(store.object_size("bkt", "key").await.unwrap(), 3);
        assert_eq!(store.head_calls(), 2);
    }

    #[tokio::test]
    async fn test_read_failure_after_bytes() {
        let store = MockStore::new();
        store.add_object("bkt", "key", &[7u8; 100]);
        store.fail_read_after("bkt", "key", 10);

        let mut reader = store.reader("bkt", "key").await.unwrap();
        let mut contents = Vec::new();
        let result = reader.read_to_end(&mut contents).await;
        assert!(result.is_err());
        assert_eq!(contents.len(), 10);
    }

    #[tokio::test]
    async fn test_in_flight_tracking() {
        let store = MockStore::new();
        store.add_object("bkt", "a", b"one");
        store.add_object("bkt", "b", b"two");

        let r1 = store.reader("bkt", "a").await.unwrap();
        let r2 = store.reader("bkt", "b").await.unwrap();
        assert_eq!(store.max_in_flight(), 2);
        drop(r1);
        drop(r2);

        // High-water mark is sticky even after readers close
        let _r3 = store.reader("bkt", "a").await.unwrap();
        assert_eq!(store.max_in_flight(), 2);
    }
}
