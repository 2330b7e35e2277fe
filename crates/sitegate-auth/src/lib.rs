//! # sitegate-auth
//!
//! The authentication core of SiteGate.
//!
//! ## Modules
//!
//! - `crypto`: constant-time comparison, base64 codecs, random bytes
//! - `password`: salted scrypt / PBKDF2 / Argon2id hashing and policy
//! - `token`: HMAC-SHA256 signed, expiring session tokens
//! - `session`: cookies, header extraction, and register/login/logout flows

pub mod crypto;
pub mod password;
pub mod session;
pub mod token;

pub use password::{CredentialRecord, KdfParams, PasswordHasher, PasswordValidator};
pub use session::{Authenticator, IssuedSession, SessionCookie, UserStore};
pub use token::{SigningKey, TokenClaims, TokenRejection, TokenService};
