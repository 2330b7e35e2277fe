//! Session cookie configuration.

use serde::{Deserialize, Serialize};

/// Attributes of the cookie that carries the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// `SameSite` attribute.
    #[serde(default)]
    pub same_site: SameSite,
    /// Whether the `Secure` attribute is set.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// `Path` attribute.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            same_site: SameSite::default(),
            secure: true,
            path: default_path(),
        }
    }
}

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    /// Sent on top-level navigations from other sites.
    #[default]
    Lax,
    /// Never sent on cross-site requests.
    Strict,
}

impl std::fmt::Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SameSite::Lax => write!(f, "Lax"),
            SameSite::Strict => write!(f, "Strict"),
        }
    }
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}
