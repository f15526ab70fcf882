//! `Authorization` header parsing.

/// Extract the token from an `Authorization` header value.
///
/// Accepts `Bearer <token>` with any casing of the scheme keyword and any
/// run of whitespace after it. The token is the first run of non-whitespace
/// characters. Returns `None` for other schemes or an empty token.
///
/// ```
/// use pln_auth::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
/// assert_eq!(parse_bearer("bearer   abc123"), Some("abc123"));
/// assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
/// ```
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    rest.split_whitespace().next()
}
