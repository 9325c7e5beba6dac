use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{AuthError, AuthResult};

/// Reads the bearer token from the `Authorization` header.
///
/// `Ok(None)` means the header is absent and the caller is anonymous. A header
/// that is present but unusable is an error, never a silent fallback.
pub fn bearer_from_headers(headers: &HeaderMap) -> AuthResult<Option<String>> {
    headers.get(AUTHORIZATION).map(parse_bearer).transpose()
}

/// Splits `<scheme> <credentials>`; the scheme name is case-insensitive
/// (RFC 7235 section 2.1) and the credentials must be a single token.
pub fn parse_bearer(value: &HeaderValue) -> AuthResult<String> {
    let raw = value.to_str().map_err(|_| AuthError::Malformed)?.trim();
    let (scheme, credentials) = raw
        .split_once(|c: char| c == ' ' || c == '\t')
        .ok_or(AuthError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::Malformed);
    }

    let token = credentials.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::Malformed);
    }
    Ok(token.to_owned())
}
