/// Extract the token from an `Authorization` header value of the form `Bearer <token>`.
///
/// The scheme is matched case-insensitively. Returns `None` for any other scheme or an
/// empty token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
