use super::errors::BearerError;

/// Name of the header that carries bearer credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Scheme prefix, compared case-insensitively.
pub const BEARER_PREFIX: &str = "bearer";

/// Extract the bare token from an authorization header value.
///
/// Accepts `bearer <token>` in any letter case. Only the shape of the token
/// is checked (three dot-separated segments); it is not decoded or verified.
///
/// # Errors
/// * `EmptyCredential` - Value is empty or whitespace
/// * `MissingBearerPrefix` - Value does not start with the bearer scheme
/// * `MalformedToken` - Token is missing or not made of three segments
pub fn extract_bearer(header_value: &str) -> Result<&str, BearerError> {
    let value = header_value.trim();
    if value.is_empty() {
        return Err(BearerError::EmptyCredential);
    }

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(BearerError::MissingBearerPrefix);
    }

    // Outer whitespace is already gone, so any left here means extra separators.
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(BearerError::MalformedToken);
    }

    if token.matches('.').count() != 2 {
        return Err(BearerError::MalformedToken);
    }

    Ok(token)
}
