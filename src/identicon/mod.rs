//! Identicon pipeline: text (and optionally a key) in, raster plus one
//! metadata field out. The keyed variant embeds the full encrypted payload so
//! the text can be recovered later; the unkeyed variant embeds the digest.

pub mod palette;
pub mod pattern;
pub mod render;

use image::RgbImage;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use crate::config::{ConfigError, NonceMode, RenderOptions};
use crate::container::{self, ContainerError, LoadedContainer};
use crate::crypto::digest::{derive_nonce, md5_digest, NONCE_LEN};
use crate::crypto::stream::{decrypt_bytes, encrypt_text_with_nonce, CryptoError};
use palette::Tone;
use pattern::GridPattern;

/// Metadata field name for the keyed variant: hex of nonce + ciphertext.
pub const ENCRYPTED_FIELD: &str = "encrypted";
/// Metadata field name for the unkeyed variant: hex of the MD5 digest.
pub const HASH_FIELD: &str = "hash";
/// Seed length driving tone and pattern selection.
pub const SEED_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum IdenticonError {
    #[error("invalid render options: {0}")]
    Options(#[from] ConfigError),
    #[error("container carries no \"{0}\" metadata field")]
    MetadataNotFound(&'static str),
    #[error("metadata hex decoding failed: {0}")]
    MalformedMetadata(String),
    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),
}

/// The single text entry attached to the output container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    pub name: &'static str,
    pub value: String,
}

/// A generated identicon with every derived stage exposed, so callers and
/// tests can compare seeds and patterns without re-deriving them.
#[derive(Debug)]
pub struct Identicon {
    pub image: RgbImage,
    pub metadata: MetadataField,
    pub seed: [u8; SEED_LEN],
    pub tone: Tone,
    pub pattern: GridPattern,
}

impl Identicon {
    /// Writes the raster and its metadata field into a PNG file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), ContainerError> {
        container::save_png(path, &self.image, self.metadata.name, &self.metadata.value)
    }
}

/// Seed extraction: the first 16 bytes of the source, zero-padded when the
/// source is shorter. Padding keeps the seed total for every input; the
/// shortest keyed payload (empty text) still yields a defined tone byte.
fn seed_from_bytes(bytes: &[u8]) -> [u8; SEED_LEN] {
    let mut seed = [0u8; SEED_LEN];
    let take = bytes.len().min(SEED_LEN);
    seed[..take].copy_from_slice(&bytes[..take]);
    seed
}

fn build(
    seed: [u8; SEED_LEN],
    metadata: MetadataField,
    options: &RenderOptions,
) -> Result<Identicon, IdenticonError> {
    let tone = Tone::from_seed(&seed);
    let pattern = GridPattern::from_seed(&seed, options.grid_count(), options.fill_threshold);
    let image = render::render(options, tone, &pattern)?;
    Ok(Identicon {
        image,
        metadata,
        seed,
        tone,
        pattern,
    })
}

/// Unkeyed variant: the MD5 digest of the text is the seed, and its hex form
/// is stored under the `"hash"` field.
pub fn generate(text: &str, options: &RenderOptions) -> Result<Identicon, IdenticonError> {
    options.validate()?;
    let digest = md5_digest(text.as_bytes());
    let metadata = MetadataField {
        name: HASH_FIELD,
        value: hex::encode(digest),
    };
    build(digest, metadata, options)
}

/// Keyed variant: the text is encrypted under the expanded key, the payload
/// head seeds tone and pattern, and the full payload hex is stored under the
/// `"encrypted"` field. With the default derived nonce the whole result is a
/// pure function of (text, key); `NonceMode::Random` draws a fresh nonce from
/// the OS instead.
pub fn generate_encrypted(
    text: &str,
    key: &str,
    options: &RenderOptions,
) -> Result<Identicon, IdenticonError> {
    options.validate()?;
    let nonce = match options.nonce_mode {
        NonceMode::Derived => derive_nonce(text, key),
        NonceMode::Random => {
            let mut nonce = [0u8; NONCE_LEN];
            OsRng.fill_bytes(&mut nonce);
            nonce
        }
    };
    let payload = encrypt_text_with_nonce(text, key, nonce);
    let payload_bytes = payload.to_bytes();
    let metadata = MetadataField {
        name: ENCRYPTED_FIELD,
        value: hex::encode(&payload_bytes),
    };
    build(seed_from_bytes(&payload_bytes), metadata, options)
}

/// Restore path: pull the `"encrypted"` field out of a loaded container,
/// hex-decode it, and decrypt with the supplied key.
pub fn restore(container: &LoadedContainer, key: &str) -> Result<String, IdenticonError> {
    let value = container
        .text(ENCRYPTED_FIELD)
        .ok_or(IdenticonError::MetadataNotFound(ENCRYPTED_FIELD))?;
    let payload_bytes =
        hex::decode(value).map_err(|e| IdenticonError::MalformedMetadata(format!("{e}")))?;
    Ok(decrypt_bytes(&payload_bytes, key)?)
}

#[cfg(test)]
mod tests {
    use super::{
        generate, generate_encrypted, restore, seed_from_bytes, IdenticonError, ENCRYPTED_FIELD,
        HASH_FIELD,
    };
    use crate::config::RenderOptions;
    use crate::container::LoadedContainer;
    use crate::crypto::stream::CryptoError;
    use crate::identicon::palette::Tone;
    use image::RgbImage;

    fn test_options() -> RenderOptions {
        RenderOptions {
            image_size: 110,
            cell_size: 10,
            cell_gap: 1,
            ..RenderOptions::default()
        }
    }

    fn container_with(name: &str, value: &str) -> LoadedContainer {
        LoadedContainer::new(RgbImage::new(1, 1), vec![(name.to_string(), value.to_string())])
    }

    #[test]
    fn unkeyed_variant_embeds_the_digest_hex() {
        let identicon = generate("hello", &test_options()).expect("generation should succeed");
        assert_eq!(identicon.metadata.name, HASH_FIELD);
        assert_eq!(identicon.metadata.value, "5d41402abc4b2a76b9719d911017c592");
        // md5("hello") ends in 0x92; 0x92 % 4 == 2 selects the purple/yellow tone.
        assert_eq!(identicon.tone, Tone::Complementary);
    }

    #[test]
    fn keyed_variant_is_deterministic() {
        let options = test_options();
        let first = generate_encrypted("user@example.com", "secret", &options)
            .expect("generation should succeed");
        let second = generate_encrypted("user@example.com", "secret", &options)
            .expect("generation should succeed");
        assert_eq!(first.metadata, second.metadata);
        assert_eq!(first.seed, second.seed);
        assert_eq!(first.tone, second.tone);
        assert_eq!(first.pattern, second.pattern);
        assert_eq!(first.image.as_raw(), second.image.as_raw());
        assert_eq!(first.metadata.name, ENCRYPTED_FIELD);
    }

    #[test]
    fn seed_is_the_payload_head() {
        let identicon = generate_encrypted("a long enough input text", "key", &test_options())
            .expect("generation should succeed");
        let payload = hex::decode(&identicon.metadata.value).expect("stored hex is valid");
        assert_eq!(identicon.seed, payload[..16]);
    }

    #[test]
    fn short_payloads_zero_pad_the_seed() {
        let seed = seed_from_bytes(&[0xaa; 10]);
        assert_eq!(seed[..10], [0xaa; 10]);
        assert_eq!(seed[10..], [0u8; 6]);

        // Empty text leaves only the 8-byte nonce; the padded tail selects
        // the residue-0 tone.
        let identicon =
            generate_encrypted("", "secret", &test_options()).expect("generation should succeed");
        assert_eq!(identicon.seed[8..], [0u8; 8]);
        assert_eq!(identicon.tone, Tone::BlueOrange);
    }

    #[test]
    fn restores_text_from_container_metadata() {
        let identicon = generate_encrypted("user@example.com", "secret", &test_options())
            .expect("generation should succeed");
        let container = container_with(ENCRYPTED_FIELD, &identicon.metadata.value);
        let recovered = restore(&container, "secret").expect("restore should succeed");
        assert_eq!(recovered, "user@example.com");
    }

    #[test]
    fn restore_with_wrong_key_never_returns_the_text() {
        let identicon = generate_encrypted("user@example.com", "secret", &test_options())
            .expect("generation should succeed");
        let container = container_with(ENCRYPTED_FIELD, &identicon.metadata.value);
        match restore(&container, "wrong") {
            Ok(garbled) => assert_ne!(garbled, "user@example.com"),
            Err(IdenticonError::Crypto(CryptoError::InvalidEncoding(_))) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn restore_reports_missing_and_malformed_metadata() {
        let missing = container_with(HASH_FIELD, "abcd");
        assert!(matches!(
            restore(&missing, "secret"),
            Err(IdenticonError::MetadataNotFound(ENCRYPTED_FIELD))
        ));

        let odd = container_with(ENCRYPTED_FIELD, "abc");
        assert!(matches!(
            restore(&odd, "secret"),
            Err(IdenticonError::MalformedMetadata(_))
        ));

        let not_hex = container_with(ENCRYPTED_FIELD, "zzzz55");
        assert!(matches!(
            restore(&not_hex, "secret"),
            Err(IdenticonError::MalformedMetadata(_))
        ));
    }
}
