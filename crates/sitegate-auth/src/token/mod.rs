//! Signed session token issuance, verification, and claims.

pub mod claims;
pub mod key;
pub mod rejection;
pub mod service;

pub use claims::TokenClaims;
pub use key::SigningKey;
pub use rejection::TokenRejection;
pub use service::TokenService;
