//! AES-256-CTR stream transform and the nonce + ciphertext envelope.
//! Encryption and decryption are the same keystream XOR, so the round-trip
//! identity `decrypt(encrypt(m)) == m` holds for any key and nonce pair.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use thiserror::Error;
use zeroize::Zeroize;

use crate::crypto::digest::{derive_nonce, expand_key, KEY_LEN, NONCE_LEN};

/// AES-256 driven by a 64-bit big-endian block counter. The 16-byte IV is the
/// 8-byte nonce followed by the counter starting at zero, matching the stored
/// payload format.
type Aes256Ctr = ctr::Ctr64BE<Aes256>;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length; expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("invalid nonce length; expected 8 bytes, got {0}")]
    InvalidNonceLength(usize),
    #[error("payload too short; the 8-byte nonce prefix is missing (got {0} bytes)")]
    TruncatedPayload(usize),
    #[error("decrypted bytes are not valid UTF-8: {0}")]
    InvalidEncoding(String),
}

/// The unit that travels through the image container: the CTR nonce followed
/// by a ciphertext of the same length as the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    pub fn new(nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    /// Splits serialized bytes back into nonce and ciphertext. An empty
    /// ciphertext is legal (the empty string encrypts to nothing); a payload
    /// shorter than the nonce is not.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < NONCE_LEN {
            return Err(CryptoError::TruncatedPayload(bytes.len()));
        }
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        Ok(Self {
            nonce,
            ciphertext: bytes[NONCE_LEN..].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// XORs the AES-256-CTR keystream for (key, nonce) into `data` in place.
/// Applying it twice with the same parameters restores the original bytes.
pub fn apply_keystream(key: &[u8], nonce: &[u8], data: &mut [u8]) -> Result<(), CryptoError> {
    let key: [u8; KEY_LEN] = key
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
    let nonce: [u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| CryptoError::InvalidNonceLength(nonce.len()))?;
    keystream_xor(&key, &nonce, data);
    Ok(())
}

fn keystream_xor(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], data: &mut [u8]) {
    let mut iv = [0u8; 16];
    iv[..NONCE_LEN].copy_from_slice(nonce);
    let mut cipher = Aes256Ctr::new(&(*key).into(), &iv.into());
    cipher.apply_keystream(data);
}

/// Encrypts `text` under the expanded `key` with an explicit nonce. The nonce
/// policy (derived or random) is the caller's decision; the payload format is
/// the same either way.
pub fn encrypt_text_with_nonce(text: &str, key: &str, nonce: [u8; NONCE_LEN]) -> EncryptedPayload {
    let mut key_bytes = expand_key(key);
    let mut buffer = text.as_bytes().to_vec();
    keystream_xor(&key_bytes, &nonce, &mut buffer);
    key_bytes.zeroize();
    EncryptedPayload::new(nonce, buffer)
}

/// Encrypts `text` with the deterministic nonce derived from (text, key).
/// Identical inputs always produce an identical payload.
pub fn encrypt_text(text: &str, key: &str) -> EncryptedPayload {
    let nonce = derive_nonce(text, key);
    encrypt_text_with_nonce(text, key, nonce)
}

/// Recovers the original text from a payload. A wrong key or a tampered
/// payload surfaces as `InvalidEncoding` when the garbled bytes fail UTF-8
/// decoding; without an authentication tag the two causes cannot be told
/// apart, and garbled-but-valid UTF-8 passes through as garbage text.
pub fn decrypt_text(payload: &EncryptedPayload, key: &str) -> Result<String, CryptoError> {
    let mut key_bytes = expand_key(key);
    let mut buffer = payload.ciphertext().to_vec();
    keystream_xor(&key_bytes, payload.nonce(), &mut buffer);
    key_bytes.zeroize();
    String::from_utf8(buffer).map_err(|e| CryptoError::InvalidEncoding(format!("{e}")))
}

/// Convenience for the restore path: split serialized bytes, then decrypt.
pub fn decrypt_bytes(bytes: &[u8], key: &str) -> Result<String, CryptoError> {
    let payload = EncryptedPayload::from_bytes(bytes)?;
    decrypt_text(&payload, key)
}
