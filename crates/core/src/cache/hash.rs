//! Content fingerprints for change detection.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 fingerprint of a document's canonical text.
///
/// Only the UTF-8 bytes of `content` feed the digest, so the same text
/// hashes identically across processes and hosts.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = content_hash("Hello world");
        let hash2 = content_hash("Hello world");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_content() {
        assert_ne!(content_hash("Hello world"), content_hash("Hello world changed"));
        assert_ne!(content_hash("abc"), content_hash("abc "));
    }

    #[test]
    fn test_hash_known_vector() {
        assert_eq!(content_hash(""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn test_hash_format() {
        let hash = content_hash("<p>page body</p>");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
