//! Authentication configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Credential hashing and session token configuration.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// Session token settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Password hashing and policy settings.
    #[serde(default)]
    pub password: PasswordConfig,
}

/// Session token configuration.
#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    /// Secret key for token signing (HMAC-SHA256). There is no default:
    /// a missing secret stops the token service from starting.
    #[serde(default)]
    pub secret: Option<SecretString>,
    /// Token lifetime in seconds; also the session cookie `Max-Age`.
    #[serde(default = "default_token_ttl")]
    pub ttl_seconds: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_seconds: default_token_ttl(),
        }
    }
}

/// Key derivation function used for new credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdfAlgorithm {
    /// scrypt (memory-hard).
    #[default]
    Scrypt,
    /// PBKDF2-HMAC-SHA256, for hosts where memory-hard KDFs are unavailable.
    Pbkdf2,
    /// Argon2id (memory-hard).
    Argon2id,
}

impl std::fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdfAlgorithm::Scrypt => write!(f, "scrypt"),
            KdfAlgorithm::Pbkdf2 => write!(f, "pbkdf2"),
            KdfAlgorithm::Argon2id => write!(f, "argon2id"),
        }
    }
}

/// Password hashing and policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Minimum password length in characters.
    #[serde(default = "default_password_min")]
    pub min_length: usize,
    /// KDF applied to new passwords.
    #[serde(default)]
    pub algorithm: KdfAlgorithm,
    /// scrypt cost as a power of two (N = 2^log_n).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,
    /// scrypt block size.
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,
    /// scrypt parallelism.
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,
    /// PBKDF2 iteration count.
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_argon2_m_cost")]
    pub argon2_m_cost_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_argon2_t_cost")]
    pub argon2_t_cost: u32,
    /// Argon2id lanes.
    #[serde(default = "default_argon2_p_cost")]
    pub argon2_p_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: default_password_min(),
            algorithm: KdfAlgorithm::default(),
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_m_cost_kib: default_argon2_m_cost(),
            argon2_t_cost: default_argon2_t_cost(),
            argon2_p_cost: default_argon2_p_cost(),
        }
    }
}

fn default_token_ttl() -> i64 {
    60 * 60 * 24 * 7
}

fn default_password_min() -> usize {
    8
}

fn default_scrypt_log_n() -> u8 {
    15
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_pbkdf2_iterations() -> u32 {
    310_000
}

fn default_argon2_m_cost() -> u32 {
    19_456
}

fn default_argon2_t_cost() -> u32 {
    2
}

fn default_argon2_p_cost() -> u32 {
    1
}
