//! Shared primitives: constant-time comparison, the credential base64
//! codec, and random bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Compares two byte slices in constant time.
///
/// A length mismatch returns `false` immediately; lengths here are fixed by
/// the algorithm (32-byte keys and MACs) so they leak nothing. Equal-length
/// inputs are compared over their full length without early exit.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Encodes bytes as standard padded base64, the storage encoding for
/// derived keys and salts.
pub fn encode_b64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard padded base64.
pub fn decode_b64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}

/// Returns `N` bytes from the thread-local CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_same() {
        assert!(constant_time_eq(b"derived-key", b"derived-key"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_constant_time_eq_different() {
        assert!(!constant_time_eq(b"derived-key", b"derived-kez"));
        assert!(!constant_time_eq(b"aerived-key", b"derived-key"));
    }

    #[test]
    fn test_constant_time_eq_different_lengths() {
        assert!(!constant_time_eq(b"short", b"shorter"));
        assert!(!constant_time_eq(b"", b"x"));
    }

    #[test]
    fn test_b64_standard_is_padded() {
        assert_eq!(encode_b64(b"ab"), "YWI=");
        assert_eq!(decode_b64("YWI=").unwrap(), b"ab".to_vec());
        assert!(decode_b64("not base64!").is_err());
    }

    #[test]
    fn test_random_bytes_differ() {
        let a = random_bytes::<16>();
        let b = random_bytes::<16>();
        assert_ne!(a, b);
    }
}
