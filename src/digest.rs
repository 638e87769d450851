/*!
 * Streaming MD5 calculation for manifest digests
 */

use md5::{Digest, Md5};

/// Streaming hasher that accumulates the content digest incrementally,
/// so an object body never has to be buffered whole.
pub struct StreamingHasher {
    hasher: Md5,
}

impl StreamingHasher {
    /// Create a new streaming hasher
    pub fn new() -> Self {
        Self { hasher: Md5::new() }
    }

    /// Update the digest with new data
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Finalize and return the digest as lowercase hex
    pub fn finalize_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl Default for StreamingHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_hasher() {
        let mut hasher = StreamingHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");

        // MD5 of "hello world"
        assert_eq!(
            hasher.finalize_hex(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_empty_input() {
        let hasher = StreamingHasher::new();
        assert_eq!(
            hasher.finalize_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_chunking_does_not_change_digest() {
        let data = b"The quick brown fox jumps over the lazy dog";

        let mut whole = StreamingHasher::new();
        whole.update(data);

        let mut chunked = StreamingHasher::new();
        for chunk in data.chunks(7) {
            chunked.update(chunk);
        }

        assert_eq!(whole.finalize_hex(), chunked.finalize_hex());
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let mut hasher = StreamingHasher::new();
        hasher.update(b"data");
        let digest = hasher.finalize_hex();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
