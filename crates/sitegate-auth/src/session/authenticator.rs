//! Register, login, logout, and current-session flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use sitegate_core::config::AppConfig;
use sitegate_core::error::AppError;

use crate::crypto::{encode_b64, random_bytes};
use crate::password::{CredentialRecord, PasswordHasher, PasswordValidator};
use crate::token::TokenService;

use super::cookie::SessionCookie;
use super::extract::extract_token;
use super::store::{NewUser, UserProfile, UserStore};

/// Message returned for every failed login.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The authenticated user.
    pub user: UserProfile,
    /// Signed session token.
    pub token: String,
    /// `Set-Cookie` header value carrying the token.
    pub set_cookie: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
}

/// Ties the hasher, token service, cookie format, and user store together.
///
/// Holds no per-session state: logout only clears the client's cookie.
pub struct Authenticator {
    hasher: PasswordHasher,
    validator: PasswordValidator,
    tokens: TokenService,
    cookie: SessionCookie,
    users: Arc<dyn UserStore>,
    /// Verified against when the email is unknown, so both failure paths
    /// cost one key derivation.
    decoy: CredentialRecord,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .field("cookie", &self.cookie)
            .finish()
    }
}

impl Authenticator {
    /// Creates an authenticator from its parts.
    pub fn new(
        hasher: PasswordHasher,
        validator: PasswordValidator,
        tokens: TokenService,
        cookie: SessionCookie,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, AppError> {
        let decoy = hasher.hash(&encode_b64(&random_bytes::<24>()), None)?;
        Ok(Self {
            hasher,
            validator,
            tokens,
            cookie,
            users,
            decoy,
        })
    }

    /// Creates an authenticator from configuration. Fails if the token
    /// secret is missing or the KDF costs are below their floors.
    pub fn from_config(config: &AppConfig, users: Arc<dyn UserStore>) -> Result<Self, AppError> {
        Self::new(
            PasswordHasher::from_config(&config.auth.password)?,
            PasswordValidator::new(&config.auth.password),
            TokenService::from_config(&config.auth.token)?,
            SessionCookie::new(&config.session),
            users,
        )
    }

    /// The token service in use.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The session cookie format in use.
    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    /// Creates an account and signs it in.
    pub async fn register(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let email = normalize_email(email)?;
        self.validator.validate(password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let credential = self
            .hasher
            .hash_blocking(password.to_string(), None)
            .await?;
        let user = self.users.insert(NewUser { email, credential }).await?;

        info!(user_id = user.id, "User registered");
        self.start_session(user.profile())
    }

    /// Checks credentials and issues a session.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            let _ = self
                .hasher
                .verify_blocking(password.to_string(), self.decoy.clone())
                .await;
            info!("Login failed: unknown account");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        let valid = self
            .hasher
            .verify_blocking(password.to_string(), user.credential.clone())
            .await
            .map_err(|e| {
                error!(user_id = user.id, error = %e, "Stored credential is unreadable");
                AppError::internal("Stored credential is unreadable")
            })?;

        if !valid {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if self.hasher.needs_rehash(&user.credential) {
            self.upgrade_credential(user.id, password).await;
        }

        info!(user_id = user.id, "Login successful");
        self.start_session(user.profile())
    }

    /// `Set-Cookie` value that ends the session on the client.
    pub fn logout(&self) -> String {
        self.cookie.clear()
    }

    /// Resolves the user behind the token in a `Cookie` or `Authorization`
    /// header.
    ///
    /// Missing or rejected tokens are a generic `Authentication` error; a
    /// valid token whose user no longer exists is `NotFound`.
    pub async fn current_user(
        &self,
        cookie_header: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<UserProfile, AppError> {
        let token = extract_token(cookie_header, authorization, self.cookie.name())
            .ok_or_else(AppError::unauthorized)?;

        let claims = self.tokens.verify(token)?;
        let user_id = claims.subject_id().ok_or_else(AppError::unauthorized)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user.profile())
    }

    fn start_session(&self, user: UserProfile) -> Result<IssuedSession, AppError> {
        let (token, expires_at) = self.tokens.issue_session(user.id, &user.email)?;
        let set_cookie = self.cookie.issue(&token, self.tokens.ttl_seconds());
        Ok(IssuedSession {
            user,
            token,
            set_cookie,
            expires_at,
        })
    }

    async fn upgrade_credential(&self, user_id: i64, password: &str) {
        let result = match self.hasher.hash_blocking(password.to_string(), None).await {
            Ok(credential) => self.users.update_credential(user_id, credential).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(
                user_id,
                algorithm = %self.hasher.kdf().algorithm(),
                "Credential re-hashed"
            ),
            Err(e) => warn!(user_id, error = %e, "Failed to re-hash credential"),
        }
    }
}

/// Trims and lowercases an email, requiring a `local@domain` shape.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();

    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !plausible {
        return Err(AppError::validation("A valid email address is required"));
    }
    Ok(email)
}
