use std::fmt;

use http::HeaderMap;
use http::header::AUTHORIZATION;

/// An opaque credential taken from a request. Not trusted until verified.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wraps a raw credential. Blank input means no credential.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Extract the bearer credential from the `Authorization` header.
///
/// A missing header, a non-UTF-8 value, or a scheme other than `Bearer`
/// all yield `None`, which callers treat as anonymous.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_bearer)
}

/// Credential of a raw `Authorization` value when its scheme is `Bearer`,
/// matched case-insensitively.
#[must_use]
pub fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, credential) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| credential.trim())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_case_insensitively() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("bearer  abc ")), Some("abc"));
    }

    #[test]
    fn parses_raw_values() {
        assert_eq!(parse_bearer(" BEARER tok "), Some("tok"));
        assert_eq!(parse_bearer("Digest tok"), None);
        assert_eq!(parse_bearer("tok"), None);
    }

    #[test]
    fn other_schemes_are_absent() {
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn blank_token_is_no_token() {
        assert!(Token::parse(None).is_none());
        assert!(Token::parse(Some("   ")).is_none());
        assert_eq!(Token::parse(Some(" t ")).map(|t| t.as_str().to_owned()), Some("t".into()));
    }

    #[test]
    fn debug_does_not_leak() {
        let token = Token::parse(Some("secret")).map(|t| format!("{t:?}"));
        assert_eq!(token.as_deref(), Some("Token(<redacted>)"));
    }
}
