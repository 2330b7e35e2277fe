//! Key derivation functions and their cost parameters.

use argon2::{Algorithm, Argon2, Version};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use sitegate_core::config::{KdfAlgorithm, PasswordConfig};
use sitegate_core::error::AppError;

/// Length of every derived key in bytes.
pub const DERIVED_KEY_LEN: usize = 32;

/// Length of generated salts in bytes; also the minimum accepted length.
pub const SALT_LEN: usize = 16;

/// Lowest scrypt cost (N = 2^15) accepted from configuration.
pub const SCRYPT_MIN_LOG_N: u8 = 15;

/// Lowest PBKDF2-HMAC-SHA256 iteration count accepted from configuration.
pub const PBKDF2_MIN_ITERATIONS: u32 = 310_000;

/// Lowest Argon2id memory cost (KiB) accepted from configuration.
pub const ARGON2_MIN_M_COST_KIB: u32 = 19_456;

/// A key derivation function together with its cost parameters.
///
/// Stored alongside each credential so that records hashed under older
/// parameters still verify after the configured defaults change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfParams {
    /// scrypt with N = 2^log_n.
    Scrypt {
        /// Log2 of the CPU/memory cost.
        log_n: u8,
        /// Block size.
        r: u32,
        /// Parallelism.
        p: u32,
    },
    /// PBKDF2-HMAC-SHA256.
    Pbkdf2 {
        /// Iteration count.
        iterations: u32,
    },
    /// Argon2id, version 0x13.
    Argon2id {
        /// Memory cost in KiB.
        m_cost_kib: u32,
        /// Iterations.
        t_cost: u32,
        /// Lanes.
        p_cost: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Scrypt {
            log_n: SCRYPT_MIN_LOG_N,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    /// Builds parameters from configuration, enforcing the cost floors.
    pub fn from_config(config: &PasswordConfig) -> Result<Self, AppError> {
        match config.algorithm {
            KdfAlgorithm::Scrypt => {
                if config.scrypt_log_n < SCRYPT_MIN_LOG_N {
                    return Err(AppError::configuration(format!(
                        "scrypt_log_n must be at least {SCRYPT_MIN_LOG_N}"
                    )));
                }
                Ok(Self::Scrypt {
                    log_n: config.scrypt_log_n,
                    r: config.scrypt_r,
                    p: config.scrypt_p,
                })
            }
            KdfAlgorithm::Pbkdf2 => {
                if config.pbkdf2_iterations < PBKDF2_MIN_ITERATIONS {
                    return Err(AppError::configuration(format!(
                        "pbkdf2_iterations must be at least {PBKDF2_MIN_ITERATIONS}"
                    )));
                }
                Ok(Self::Pbkdf2 {
                    iterations: config.pbkdf2_iterations,
                })
            }
            KdfAlgorithm::Argon2id => {
                if config.argon2_m_cost_kib < ARGON2_MIN_M_COST_KIB {
                    return Err(AppError::configuration(format!(
                        "argon2_m_cost_kib must be at least {ARGON2_MIN_M_COST_KIB}"
                    )));
                }
                Ok(Self::Argon2id {
                    m_cost_kib: config.argon2_m_cost_kib,
                    t_cost: config.argon2_t_cost,
                    p_cost: config.argon2_p_cost,
                })
            }
        }
    }

    /// Returns the algorithm these parameters belong to.
    pub fn algorithm(&self) -> KdfAlgorithm {
        match self {
            Self::Scrypt { .. } => KdfAlgorithm::Scrypt,
            Self::Pbkdf2 { .. } => KdfAlgorithm::Pbkdf2,
            Self::Argon2id { .. } => KdfAlgorithm::Argon2id,
        }
    }

    /// Derives a [`DERIVED_KEY_LEN`]-byte key from `password` and `salt`.
    ///
    /// Errors only on parameters the underlying KDF refuses.
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], AppError> {
        let mut out = [0u8; DERIVED_KEY_LEN];

        match *self {
            Self::Scrypt { log_n, r, p } => {
                let params = scrypt::Params::new(log_n, r, p, DERIVED_KEY_LEN)
                    .map_err(|e| {
                        AppError::configuration(format!("Invalid scrypt parameters: {e}"))
                    })?;
                scrypt::scrypt(password, salt, &params, &mut out)
                    .map_err(|e| AppError::internal(format!("scrypt derivation failed: {e}")))?;
            }
            Self::Pbkdf2 { iterations } => {
                if iterations == 0 {
                    return Err(AppError::configuration(
                        "PBKDF2 iteration count must be positive",
                    ));
                }
                pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
            }
            Self::Argon2id {
                m_cost_kib,
                t_cost,
                p_cost,
            } => {
                let params = argon2::Params::new(m_cost_kib, t_cost, p_cost, Some(DERIVED_KEY_LEN))
                    .map_err(|e| {
                        AppError::configuration(format!("Invalid Argon2 parameters: {e}"))
                    })?;
                Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                    .hash_password_into(password, salt, &mut out)
                    .map_err(|e| AppError::internal(format!("Argon2 derivation failed: {e}")))?;
            }
        }

        Ok(out)
    }
}
