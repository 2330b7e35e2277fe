//! Issuing and verifying HMAC-SHA256 session tokens.
//!
//! Tokens are compact JWS strings, `b64url(header) "." b64url(claims) "."
//! b64url(signature)`, with the header `{"typ":"TOKEN","alg":"HS256"}`.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use tracing::debug;

use sitegate_core::config::TokenConfig;
use sitegate_core::error::AppError;

use super::claims::{EXPIRES_AT, ISSUED_AT, TokenClaims};
use super::key::SigningKey;
use super::rejection::TokenRejection;

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Value of the header's `typ` field.
pub const TOKEN_TYPE: &str = "TOKEN";

/// Issues and verifies signed, time-limited session tokens.
#[derive(Clone)]
pub struct TokenService {
    /// HMAC key for signing.
    encoding_key: EncodingKey,
    /// HMAC key for verification.
    decoding_key: DecodingKey,
    /// Header stamped on every issued token.
    header: Header,
    /// Signature and algorithm checks only; expiry is checked separately.
    validation: Validation,
    /// Lifetime of tokens issued by [`issue_session`](Self::issue_session).
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("header", &self.header)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    /// Creates a service around an existing key.
    pub fn new(key: SigningKey, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(key.expose()),
            decoding_key: DecodingKey::from_secret(key.expose()),
            header: Header {
                typ: Some(TOKEN_TYPE.to_string()),
                ..Header::new(ALGORITHM)
            },
            validation,
            ttl_seconds,
        }
    }

    /// Creates a service from configuration.
    ///
    /// A missing or too-short secret is a configuration error; the process
    /// should refuse to start rather than check per call.
    pub fn from_config(config: &TokenConfig) -> Result<Self, AppError> {
        let secret = config
            .secret
            .as_ref()
            .ok_or_else(|| AppError::configuration("Token signing secret is not configured"))?;
        let key = SigningKey::new(secret.expose_secret().as_bytes().to_vec())?;

        if config.ttl_seconds <= 0 {
            return Err(AppError::configuration("Token ttl_seconds must be positive"));
        }

        Ok(Self::new(key, config.ttl_seconds))
    }

    /// Configured session lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issues a token carrying `{sub, email}` with the configured lifetime,
    /// returning it with its expiry.
    pub fn issue_session(
        &self,
        user_id: i64,
        email: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let token = self.issue_at(
            &TokenClaims::session(user_id, email),
            self.ttl_seconds,
            now.timestamp(),
        )?;
        let expires_at = DateTime::from_timestamp(now.timestamp() + self.ttl_seconds, 0)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;
        Ok((token, expires_at))
    }

    /// Issues a token for `claims` that expires `ttl_seconds` from now.
    ///
    /// `iat` and `exp` are injected and replace any caller-supplied values.
    /// A non-positive ttl produces a token that is already expired.
    pub fn issue(&self, claims: &TokenClaims, ttl_seconds: i64) -> Result<String, AppError> {
        self.issue_at(claims, ttl_seconds, Utc::now().timestamp())
    }

    /// [`issue`](Self::issue) with an explicit clock, in Unix seconds.
    pub fn issue_at(
        &self,
        claims: &TokenClaims,
        ttl_seconds: i64,
        now: i64,
    ) -> Result<String, AppError> {
        claims.validate_flat()?;

        let expires_at = now
            .checked_add(ttl_seconds)
            .ok_or_else(|| AppError::validation("Token lifetime out of range"))?;

        let mut full = claims.clone();
        full.insert(ISSUED_AT, now);
        full.insert(EXPIRES_AT, expires_at);

        encode(&self.header, &full, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// Never panics: any malformed input is a [`TokenRejection`].
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// [`verify`](Self::verify) with an explicit clock, in Unix seconds.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenClaims, TokenRejection> {
        let outcome = self.check(token, now);
        if let Err(rejection) = &outcome {
            debug!(reason = rejection.reason(), "Session token rejected");
        }
        outcome
    }

    fn check(&self, token: &str, now: i64) -> Result<TokenClaims, TokenRejection> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenRejection::Malformed);
        }

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            })?
            .claims;

        claims
            .validate_flat()
            .map_err(|_| TokenRejection::Malformed)?;

        if let Some(exp) = claims.get(EXPIRES_AT) {
            let exp = exp.as_i64().ok_or(TokenRejection::Malformed)?;
            if now > exp {
                return Err(TokenRejection::Expired);
            }
        }

        Ok(claims)
    }
}
