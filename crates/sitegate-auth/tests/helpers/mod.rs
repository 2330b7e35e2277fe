//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sitegate_auth::password::{CredentialRecord, KdfParams, PasswordHasher, PasswordValidator};
use sitegate_auth::session::{Authenticator, NewUser, SessionCookie, StoredUser, UserStore};
use sitegate_auth::token::{SigningKey, TokenService};
use sitegate_core::config::PasswordConfig;
use sitegate_core::error::AppError;
use sitegate_core::result::AppResult;

/// Signing secret used by every test authenticator.
pub const SECRET: &[u8] = b"integration-test-signing-secret!";

/// Cheap scrypt parameters so tests do not spend seconds per hash.
pub const FAST_KDF: KdfParams = KdfParams::Scrypt {
    log_n: 4,
    r: 8,
    p: 1,
};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<i64, StoredUser>,
}

/// In-memory `UserStore` keyed by id with unique emails.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    /// Removes a user, simulating an account deleted after login.
    pub fn remove(&self, id: i64) {
        self.inner.lock().unwrap().users.remove(&id);
    }

    /// Returns the stored record for `email`.
    pub fn get_by_email(&self, email: &str) -> Option<StoredUser> {
        let inner = self.inner.lock().unwrap();
        inner.users.values().find(|u| u.email == email).cloned()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        Ok(self.get_by_email(email))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<StoredUser>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> AppResult<StoredUser> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already registered"));
        }
        inner.next_id += 1;
        let stored = StoredUser {
            id: inner.next_id,
            email: user.email,
            credential: user.credential,
        };
        inner.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_credential(&self, id: i64, credential: CredentialRecord) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.credential = credential;
        Ok(())
    }
}

/// Test application context.
pub struct TestApp {
    /// The authenticator under test.
    pub auth: Authenticator,
    /// Backing store, for direct inspection.
    pub store: Arc<MemoryUserStore>,
}

impl TestApp {
    /// Creates an authenticator with fast KDF costs and a one-hour ttl.
    pub fn new() -> Self {
        Self::with_kdf(FAST_KDF)
    }

    /// Creates an authenticator whose hasher uses `kdf`.
    pub fn with_kdf(kdf: KdfParams) -> Self {
        let store = Arc::new(MemoryUserStore::default());
        Self::with_store(kdf, Arc::clone(&store))
    }

    /// Creates an authenticator over an existing store.
    pub fn with_store(kdf: KdfParams, store: Arc<MemoryUserStore>) -> Self {
        let auth = Authenticator::new(
            PasswordHasher::new(kdf),
            PasswordValidator::new(&PasswordConfig::default()),
            token_service(3600),
            SessionCookie::default(),
            Arc::clone(&store) as Arc<dyn UserStore>,
        )
        .expect("Failed to build authenticator");
        Self { auth, store }
    }
}

/// A token service with the shared test secret.
pub fn token_service(ttl_seconds: i64) -> TokenService {
    TokenService::new(
        SigningKey::new(SECRET.to_vec()).expect("valid secret"),
        ttl_seconds,
    )
}

/// Extracts `name=value` from a `Set-Cookie` header value and formats it as
/// a request `Cookie` header.
pub fn cookie_header(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string()
}
