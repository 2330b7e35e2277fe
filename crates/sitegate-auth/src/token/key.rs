//! The token signing secret.

use secrecy::{ExposeSecret, SecretSlice};

use sitegate_core::error::AppError;

/// Minimum signing secret length in bytes.
///
/// RFC 7518 section 3.2 requires an HS256 key at least as long as the
/// hash output, 256 bits. Shorter secrets are refused at start-up.
pub const MIN_SECRET_LEN: usize = 32;

/// HMAC signing secret. Zeroized on drop and never printed.
///
/// [`TokenService`](super::TokenService) consumes it when building its
/// signing and verification keys.
pub struct SigningKey(SecretSlice<u8>);

impl SigningKey {
    /// Wraps a secret of at least [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AppError> {
        let secret: Vec<u8> = secret.into();
        if secret.is_empty() {
            return Err(AppError::configuration("Token signing secret is empty"));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "Token signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(Self(SecretSlice::from(secret)))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
