//! # Address Newtypes
//!
//! Lexically validated URLs and email addresses. These back the `mwUrl`,
//! `articleList`, `customZimFavicon` and `adminEmail` offliner flags.
//!
//! Both types keep the submitted text verbatim. [`AbsoluteUrl`] also keeps
//! the parsed [`url::Url`] for callers that need its components, but its
//! serialized form is the original string, never the normalized one
//! (`url` would append a trailing `/` to `https://www.wikipedia.org`).

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// An absolute URL with a scheme and a non-empty authority.
///
/// # Validation
///
/// - No whitespace anywhere
/// - Scheme followed by the literal `://` separator
/// - Scheme starts with an ASCII letter, then letters, digits, `+`, `-`, `.`
/// - Parses with [`url::Url`] and has a non-empty host
///
/// The literal separator check matters: `url` is lenient and would parse
/// `http:/example.com` as `http://example.com/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AbsoluteUrl {
    raw: String,
    parsed: Url,
}

impl AbsoluteUrl {
    /// Create a URL from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUrl`] with the reason if the string
    /// is not an absolute `scheme://authority` URL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let fail = |reason: &str| ValidationError::InvalidUrl {
            value: raw.clone(),
            reason: reason.to_string(),
        };

        if raw.chars().any(char::is_whitespace) {
            return Err(fail("contains whitespace"));
        }

        let Some((scheme, _)) = raw.split_once("://") else {
            return Err(fail("missing \"://\" after scheme"));
        };
        let mut scheme_chars = scheme.chars();
        let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(fail("invalid scheme"));
        }

        let parsed = Url::parse(&raw).map_err(|e| fail(&e.to_string()))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(fail("missing host"));
        }

        Ok(Self { raw, parsed })
    }

    /// Access the URL exactly as submitted.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Access the parsed URL.
    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

impl TryFrom<String> for AbsoluteUrl {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AbsoluteUrl> for String {
    fn from(url: AbsoluteUrl) -> Self {
        url.raw
    }
}

impl std::fmt::Display for AbsoluteUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Maximum length of the local part of an email address.
const EMAIL_LOCAL_MAX_LEN: usize = 64;
/// Maximum length of the domain part of an email address.
const EMAIL_DOMAIN_MAX_LEN: usize = 253;
/// Maximum length of a single domain label.
const DOMAIN_LABEL_MAX_LEN: usize = 63;

/// An email address in conservative `local@domain` form.
///
/// # Validation
///
/// - No whitespace or control characters
/// - Exactly one `@`
/// - Local part: 1-64 characters from the RFC 5322 atom set plus `.`,
///   no leading, trailing or doubled `.`
/// - Domain: at most 253 characters, at least two dot-separated labels,
///   each 1-63 ASCII letters, digits or `-`, not starting or ending with `-`
/// - Top-level label is not all digits
///
/// Quoted local parts and IP-literal domains are not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create an email address from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] with the reason if the
    /// string does not match the accepted syntax.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if let Err(reason) = Self::validate(&s) {
            return Err(ValidationError::InvalidEmail {
                value: s,
                reason: reason.to_string(),
            });
        }
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), &'static str> {
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err("contains whitespace");
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err("expected exactly one '@'");
        };

        if local.is_empty() || local.len() > EMAIL_LOCAL_MAX_LEN {
            return Err("local part must be 1-64 characters");
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err("misplaced '.' in local part");
        }
        if !local.chars().all(is_atom_char_or_dot) {
            return Err("invalid character in local part");
        }

        if domain.is_empty() || domain.len() > EMAIL_DOMAIN_MAX_LEN {
            return Err("domain must be 1-253 characters");
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return Err("domain must contain a '.'");
        }
        for label in &labels {
            if label.is_empty() || label.len() > DOMAIN_LABEL_MAX_LEN {
                return Err("domain label must be 1-63 characters");
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err("domain label must not start or end with '-'");
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err("invalid character in domain");
            }
        }
        if labels
            .last()
            .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
        {
            return Err("top-level domain must not be numeric");
        }

        Ok(())
    }

    /// Access the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

fn is_atom_char_or_dot(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
