//! Input validation and sanitization
//!
//! A stateless gate for untrusted strings. [`validate_input`] rejects absent,
//! empty, oversized or (optionally) markup-bearing input; [`sanitize`] escapes
//! text for insertion into rendered UI.

pub mod patterns;
pub mod sanitize;

use crate::{Error, Result};
use std::fmt;
use std::ops::Deref;

pub use patterns::{InjectionSignature, find_injection};
pub use sanitize::sanitize;

/// Maximum input length used by [`validate`]
pub const DEFAULT_MAX_LENGTH: usize = 1000;

const INVALID_INPUT_MESSAGE: &str = "無効な入力です";
const EMPTY_INPUT_MESSAGE: &str = "入力が空です";
const UNSAFE_INPUT_MESSAGE: &str = "不正な内容が含まれています";

/// Trimmed input that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafeString(String);

impl SafeString {
    /// Borrow the validated text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the validated text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for SafeString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SafeString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SafeString> for String {
    fn from(value: SafeString) -> Self {
        value.0
    }
}

/// Validate an untrusted string.
///
/// The input is trimmed first; the length bound counts Unicode scalar values of
/// the trimmed text. With `allow_html` set, the injection signature scan is
/// skipped and the trimmed text is returned as is.
///
/// # Errors
///
/// * [`Error::Validation`] when the input is absent, blank, or longer than
///   `max_length`.
/// * [`Error::Security`] when `allow_html` is false and the text matches an
///   [`InjectionSignature`].
///
/// # Examples
///
/// ```rust
/// use veteran_client::validation::validate_input;
///
/// let safe = validate_input(Some("  hello  "), 100, false).unwrap();
/// assert_eq!(safe.as_str(), "hello");
///
/// assert!(validate_input(Some("<script>alert(1)</script>"), 100, false).is_err());
/// ```
pub fn validate_input(input: Option<&str>, max_length: usize, allow_html: bool) -> Result<SafeString> {
    let Some(input) = input else {
        return Err(Error::validation(INVALID_INPUT_MESSAGE));
    };

    let trimmed = trim_input(input);
    if trimmed.is_empty() {
        return Err(Error::validation(EMPTY_INPUT_MESSAGE));
    }

    if trimmed.chars().count() > max_length {
        return Err(Error::validation(format!(
            "入力は{}文字以内にしてください",
            max_length
        )));
    }

    if !allow_html {
        if let Some(signature) = find_injection(trimmed) {
            tracing::warn!("Rejected input matching {:?} signature", signature);
            return Err(Error::security(UNSAFE_INPUT_MESSAGE));
        }
    }

    Ok(SafeString(trimmed.to_string()))
}

/// Strip surrounding whitespace and byte order marks
fn trim_input(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Validate with [`DEFAULT_MAX_LENGTH`] and markup disallowed
pub fn validate(input: &str) -> Result<SafeString> {
    validate_input(Some(input), DEFAULT_MAX_LENGTH, false)
}
