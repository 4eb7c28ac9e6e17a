//! Email validation

use once_cell::sync::Lazy;
use regex::Regex;

// RFC 5322 approximation: dotted local part or a quoted string, then either
// a bracketed IPv4 literal or a dotted domain with an alphabetic TLD.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is a valid regex")
});

/// Validates an email address against the RFC 5322 approximation.
///
/// An empty string is not a valid address; callers that treat emptiness
/// separately (the `EMPTY` rule) should skip empty values before calling.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
