//! Input URL validation for the create flow.
//!
//! The submitted URL is stored and hashed exactly as given (minus surrounding
//! whitespace), so resolving a code always returns the caller's string. This
//! module only decides whether the input is acceptable.

use url::Url;

/// Longest URL accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a submitted URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {} characters", MAX_URL_LENGTH)]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Checks a submitted URL and returns it with surrounding whitespace removed.
///
/// # Rules
///
/// 1. Must not be empty or whitespace-only
/// 2. At most [`MAX_URL_LENGTH`] bytes
/// 3. Must parse as an absolute URL
/// 4. Scheme must be `http` or `https`
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-HTTP scheme, so
/// the redirect endpoint can never be turned into a script or file vector.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url("  https://example.com/a  "), Ok("https://example.com/a"));
/// assert_eq!(validate_url("   "), Err(UrlValidationError::Empty));
/// ```
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_https() {
        assert_eq!(validate_url("https://example.com"), Ok("https://example.com"));
    }

    #[test]
    fn test_accepts_simple_http() {
        assert_eq!(
            validate_url("http://example.com/path"),
            Ok("http://example.com/path")
        );
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(
            validate_url("  https://example.com/a \n"),
            Ok("https://example.com/a")
        );
    }

    #[test]
    fn test_preserves_input_verbatim() {
        let input = "HTTPS://EXAMPLE.COM:443/Path?key=VALUE#anchor";
        assert_eq!(validate_url(input), Ok(input));
    }

    #[test]
    fn test_accepts_query_and_encoded_characters() {
        assert!(validate_url("https://example.com/search?q=rust&lang=en").is_ok());
        assert!(validate_url("https://example.com/path%20with%20spaces").is_ok());
    }

    #[test]
    fn test_accepts_ip_and_localhost() {
        assert!(validate_url("http://192.168.1.1:8080/api").is_ok());
        assert!(validate_url("http://localhost:3000/test").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_url(""), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(validate_url(" \t\n "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_accepts_long_url_within_limit() {
        let url = format!("https://example.com/{}", "a".repeat(2000));
        assert!(validate_url(&url).is_ok());
    }

    #[test]
    fn test_rejects_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_url(&url), Err(UrlValidationError::TooLong));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_url("not a valid url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(
            validate_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        for input in [
            "ftp://example.com/file.txt",
            "file:///home/user/document.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
        ] {
            assert_eq!(
                validate_url(input),
                Err(UrlValidationError::UnsupportedProtocol),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(UrlValidationError::Empty.to_string(), "URL must not be empty");
        assert!(
            UrlValidationError::TooLong
                .to_string()
                .contains(&MAX_URL_LENGTH.to_string())
        );
    }
}
