//! Short fingerprints of session keys.
//!
//! The server logs the fingerprint of its active key at start-up so
//! operators can tell whether two instances share a key, or whether a
//! rotation took effect, without the key material reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Bytes of the SHA-256 digest kept, before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Lower-case hex of the first eight bytes of SHA-256 over the key's
/// signing half.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use quill::inbound::http::session_config::key_fingerprint;
///
/// let key = Key::derive_from(&[7; 64]);
/// let fingerprint = key_fingerprint(&key);
/// assert_eq!(fingerprint.len(), 16);
/// assert_eq!(fingerprint, key_fingerprint(&Key::derive_from(&[7; 64])));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'a', b'a', true)]
    #[case(b'a', b'b', false)]
    fn fingerprint_tracks_key_material(#[case] left: u8, #[case] right: u8, #[case] same: bool) {
        let left = key_fingerprint(&Key::derive_from(&[left; 64]));
        let right = key_fingerprint(&Key::derive_from(&[right; 64]));
        assert_eq!(left == right, same);
    }

    #[rstest]
    fn fingerprint_is_sixteen_lowercase_hex_digits() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}
