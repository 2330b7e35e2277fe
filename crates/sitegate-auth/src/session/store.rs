//! Storage collaborator contract for user records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sitegate_core::result::AppResult;

use crate::password::CredentialRecord;

/// A persisted user: `{id, email, pw_hash, pw_salt}` plus KDF parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    /// Row identifier; the token subject.
    pub id: i64,
    /// Lowercased email address.
    pub email: String,
    /// Password credential.
    pub credential: CredentialRecord,
}

impl StoredUser {
    /// Public view without the credential.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// A user record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Lowercased email address.
    pub email: String,
    /// Password credential.
    pub credential: CredentialRecord,
}

/// What callers learn about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: i64,
    /// Lowercased email address.
    pub email: String,
}

/// User persistence. Emails are passed already normalised; implementations
/// must keep them unique.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by normalised email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredUser>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<StoredUser>>;

    /// Insert a user and return it with its assigned id. Returns a
    /// `Conflict` error if the email is already taken.
    async fn insert(&self, user: NewUser) -> AppResult<StoredUser>;

    /// Replace a user's credential.
    async fn update_credential(&self, id: i64, credential: CredentialRecord) -> AppResult<()>;
}
