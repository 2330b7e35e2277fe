//! Salted password hashing and constant-time verification.

use serde::{Deserialize, Serialize};

use sitegate_core::config::PasswordConfig;
use sitegate_core::error::AppError;

use crate::crypto::{constant_time_eq, decode_b64, encode_b64, random_bytes};

use super::kdf::{KdfParams, SALT_LEN};

/// A persisted credential: base64 derived key, base64 salt, and the KDF
/// parameters that produced the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Standard base64 of the 32-byte derived key.
    pub derived_key: String,
    /// Standard base64 of the salt.
    pub salt: String,
    /// KDF and cost parameters.
    pub kdf: KdfParams,
}

/// Hashes and verifies passwords with a fixed set of KDF parameters.
///
/// Stateless: every call is independent and the hasher may be shared
/// across threads freely.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    kdf: KdfParams,
}

impl PasswordHasher {
    /// Creates a hasher that uses `kdf` for new credentials.
    pub fn new(kdf: KdfParams) -> Self {
        Self { kdf }
    }

    /// Creates a hasher from configuration, enforcing the cost floors.
    pub fn from_config(config: &PasswordConfig) -> Result<Self, AppError> {
        Ok(Self::new(KdfParams::from_config(config)?))
    }

    /// Returns the parameters used for new credentials.
    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    /// Hashes `password`.
    ///
    /// A fresh random 16-byte salt is generated unless `salt` (standard
    /// base64, at least 16 bytes) is supplied. Length policy is the
    /// caller's concern; only the empty password is refused here.
    pub fn hash(&self, password: &str, salt: Option<&str>) -> Result<CredentialRecord, AppError> {
        if password.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }

        let salt = match salt {
            Some(encoded) => decode_salt(encoded)?,
            None => random_bytes::<SALT_LEN>().to_vec(),
        };

        let key = self.kdf.derive(password.as_bytes(), &salt)?;

        Ok(CredentialRecord {
            derived_key: encode_b64(&key),
            salt: encode_b64(&salt),
            kdf: self.kdf,
        })
    }

    /// Verifies `password` against a stored hash and salt produced with this
    /// hasher's parameters.
    ///
    /// Returns `Ok(false)` for a wrong or empty password and `Err` only when
    /// the stored values are malformed.
    pub fn verify(
        &self,
        password: &str,
        stored_hash: &str,
        stored_salt: &str,
    ) -> Result<bool, AppError> {
        verify_with(&self.kdf, password, stored_hash, stored_salt)
    }

    /// Verifies `password` against a record using the record's own KDF
    /// parameters.
    pub fn verify_record(
        &self,
        password: &str,
        record: &CredentialRecord,
    ) -> Result<bool, AppError> {
        verify_with(&record.kdf, password, &record.derived_key, &record.salt)
    }

    /// Whether `record` was produced with parameters other than the current
    /// ones and should be re-hashed after the next successful login.
    pub fn needs_rehash(&self, record: &CredentialRecord) -> bool {
        record.kdf != self.kdf
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(
        &self,
        password: String,
        salt: Option<String>,
    ) -> Result<CredentialRecord, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password, salt.as_deref()))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`verify_record`](Self::verify_record) on the blocking thread pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        record: CredentialRecord,
    ) -> Result<bool, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_record(&password, &record))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
    }
}

fn decode_salt(encoded: &str) -> Result<Vec<u8>, AppError> {
    let salt = decode_b64(encoded)
        .map_err(|e| AppError::validation(format!("Invalid salt encoding: {e}")))?;
    if salt.len() < SALT_LEN {
        return Err(AppError::validation(format!(
            "Salt must be at least {SALT_LEN} bytes"
        )));
    }
    Ok(salt)
}

fn verify_with(
    kdf: &KdfParams,
    password: &str,
    stored_hash: &str,
    stored_salt: &str,
) -> Result<bool, AppError> {
    let expected = decode_b64(stored_hash)
        .map_err(|e| AppError::validation(format!("Invalid stored hash encoding: {e}")))?;
    let salt = decode_salt(stored_salt)?;

    if password.is_empty() {
        return Ok(false);
    }

    let actual = kdf.derive(password.as_bytes(), &salt)?;
    Ok(constant_time_eq(&actual, &expected))
}
