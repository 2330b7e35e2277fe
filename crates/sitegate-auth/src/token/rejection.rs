//! Verification outcomes other than success.

use sitegate_core::error::AppError;

/// Why a token was rejected.
///
/// Every variant displays identically so that callers cannot tell a
/// forged token from an expired one; use [`reason`](Self::reason) for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    /// Wrong shape, bad encoding, unreadable header or claims.
    #[error("unauthorized")]
    Malformed,
    /// Signature does not match the signing key.
    #[error("unauthorized")]
    BadSignature,
    /// Signature is valid but `exp` has passed.
    #[error("unauthorized")]
    Expired,
}

impl TokenRejection {
    /// Internal reason, for logging only.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
        }
    }
}

impl From<TokenRejection> for AppError {
    fn from(_: TokenRejection) -> Self {
        AppError::unauthorized()
    }
}
