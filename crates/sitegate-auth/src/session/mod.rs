//! The boundary between the authentication core and a web layer:
//! cookies, header extraction, and the account flows.

pub mod authenticator;
pub mod cookie;
pub mod extract;
pub mod store;

pub use authenticator::{Authenticator, IssuedSession, normalize_email};
pub use cookie::SessionCookie;
pub use extract::extract_token;
pub use store::{NewUser, StoredUser, UserProfile, UserStore};
