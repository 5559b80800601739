//! Digest helpers for seed and key derivation. These utilities are kept
//! separate from the stream cipher to avoid accidental API misuse: everything
//! here is a pure function of its input bytes.

use md5::Md5;
use sha2::{Digest, Sha256};

/// Length of an MD5 digest, which doubles as the identicon seed length.
pub const DIGEST_LEN: usize = 16;
/// Length of an expanded AES-256 cipher key.
pub const KEY_LEN: usize = 32;
/// Length of the CTR nonce stored ahead of the ciphertext.
pub const NONCE_LEN: usize = 8;

/// Produces a raw MD5 digest of the provided bytes.
pub fn md5_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the lowercase hexadecimal representation of an MD5 digest.
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5_digest(data))
}

/// Expands an arbitrary key string into a 32-byte AES-256 key via SHA-256.
/// Any string is accepted, including the empty one; the expansion is
/// deterministic and never persisted.
pub fn expand_key(key: &str) -> [u8; KEY_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}

/// Derives the CTR nonce as the first 8 bytes of `md5(text || key)`.
///
/// The concatenation carries no separator, so ("ab", "c") and ("a", "bc")
/// derive the same nonce. The expanded keys still differ, which keeps the
/// final ciphertexts distinct; the derived key, not the nonce, is what
/// separates the two inputs.
pub fn derive_nonce(text: &str, key: &str) -> [u8; NONCE_LEN] {
    let mut combined = Vec::with_capacity(text.len() + key.len());
    combined.extend_from_slice(text.as_bytes());
    combined.extend_from_slice(key.as_bytes());
    let digest = md5_digest(&combined);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&digest[..NONCE_LEN]);
    nonce
}

#[cfg(test)]
mod tests {
    use super::{derive_nonce, expand_key, md5_digest, md5_hex};

    #[test]
    fn hashes_to_hex() {
        assert_eq!(md5_hex(b"hello"), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn expands_empty_key() {
        assert_eq!(
            hex::encode(expand_key("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn nonce_is_digest_prefix() {
        let digest = md5_digest(b"user@example.comsecret");
        let nonce = derive_nonce("user@example.com", "secret");
        assert_eq!(nonce, digest[..8]);
    }

    #[test]
    fn nonce_ignores_text_key_boundary() {
        // Concatenation without a separator: only the combined bytes matter.
        assert_eq!(derive_nonce("ab", "c"), derive_nonce("a", "bc"));
        assert_ne!(expand_key("c"), expand_key("bc"));
    }
}
