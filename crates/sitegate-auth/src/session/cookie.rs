//! `Set-Cookie` values for the session token.

use sitegate_core::config::{SameSite, SessionConfig};

/// Formats the cookie that carries the session token.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    path: String,
    same_site: SameSite,
    secure: bool,
}

impl SessionCookie {
    /// Creates a cookie formatter from session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            path: config.path.clone(),
            same_site: config.same_site,
            secure: config.secure,
        }
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Set-Cookie` value storing `token` for `max_age_seconds`.
    pub fn issue(&self, token: &str, max_age_seconds: i64) -> String {
        self.render(token, max_age_seconds.max(0))
    }

    /// `Set-Cookie` value instructing the client to discard the session.
    pub fn clear(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: i64) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={}; Path={}; HttpOnly{}; SameSite={}; Max-Age={}",
            self.name, value, self.path, secure, self.same_site, max_age
        )
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
