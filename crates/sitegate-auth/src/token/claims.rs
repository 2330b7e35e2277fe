//! Flat claim set carried inside a session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sitegate_core::error::AppError;

/// Claim holding the subject (user) identifier.
pub const SUBJECT: &str = "sub";
/// Claim holding the user's normalised email address.
pub const EMAIL: &str = "email";
/// Issued-at timestamp, seconds since the Unix epoch.
pub const ISSUED_AT: &str = "iat";
/// Expiry timestamp, seconds since the Unix epoch.
pub const EXPIRES_AT: &str = "exp";

/// A flat mapping of claim names to strings, numbers, or booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims identifying a logged-in user.
    pub fn session(user_id: i64, email: &str) -> Self {
        Self::new().with(SUBJECT, user_id).with(EMAIL, email)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a claim, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a claim by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Removes a claim by name.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all claims.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The subject as a numeric user id; numeric strings are accepted.
    pub fn subject_id(&self) -> Option<i64> {
        match self.get(SUBJECT)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// The email claim.
    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL).and_then(Value::as_str)
    }

    /// The `iat` claim.
    pub fn issued_at(&self) -> Option<i64> {
        self.get(ISSUED_AT).and_then(Value::as_i64)
    }

    /// The `exp` claim.
    pub fn expires_at(&self) -> Option<i64> {
        self.get(EXPIRES_AT).and_then(Value::as_i64)
    }

    /// The `exp` claim as a `DateTime<Utc>`.
    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.expires_at()
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Remaining lifetime in seconds (0 if expired or no `exp` claim).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let Some(exp) = self.expires_at() else {
            return 0;
        };
        let remaining = exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }

    /// Checks that every value is a string, number, or boolean.
    pub fn validate_flat(&self) -> Result<(), AppError> {
        for (key, value) in &self.0 {
            match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Claim '{key}' must be a string, number, or boolean"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<TokenClaims> for Map<String, Value> {
    fn from(claims: TokenClaims) -> Self {
        claims.0
    }
}
