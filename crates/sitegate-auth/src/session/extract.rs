//! Locating the session token in request headers.

/// Returns the session token from the named cookie, falling back to an
/// `Authorization: Bearer` header.
pub fn extract_token<'a>(
    cookie_header: Option<&'a str>,
    authorization: Option<&'a str>,
    cookie_name: &str,
) -> Option<&'a str> {
    cookie_header
        .and_then(|header| cookie_value(header, cookie_name))
        .or_else(|| authorization.and_then(bearer_token))
}

/// Value of `name` in a `Cookie` header, if present and non-empty.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Token from an `Authorization` header using the `Bearer` scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}
