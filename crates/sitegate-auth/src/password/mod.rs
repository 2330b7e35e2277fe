//! Password hashing and policy enforcement.

pub mod hasher;
pub mod kdf;
pub mod validator;

pub use hasher::{CredentialRecord, PasswordHasher};
pub use kdf::KdfParams;
pub use validator::PasswordValidator;
