//! Validated, normalized email addresses.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// A validated email address, normalized to trimmed lower-case form.
///
/// Equality is by normalized value, so `A@x.com` and `a@x.com` compare
/// equal. Serializes as the normalized string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    value: String,
}

impl Email {
    /// Parses and normalizes an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyValue { field: "email" });
        }
        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(DomainError::InvalidFormat(trimmed.to_string()));
        }
        Ok(Self {
            value: trimmed.to_lowercase(),
        })
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the part before the `@`.
    pub fn local_part(&self) -> &str {
        self.value.split('@').next().unwrap_or("")
    }

    /// Returns the part after the `@`.
    pub fn domain(&self) -> &str {
        self.value.split('@').nth(1).unwrap_or("")
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Email::new(raw)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = Email::new("  Ann@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ann@example.com");
    }

    #[test]
    fn test_equality_is_by_normalized_value() {
        assert_eq!(Email::new("A@x.com").unwrap(), Email::new("a@x.com").unwrap());
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(
            Email::new("   "),
            Err(DomainError::EmptyValue { field: "email" })
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in ["no-at-sign", "a@b", "a@b.", "@x.com", "a b@x.com"] {
            assert!(
                matches!(Email::new(raw), Err(DomainError::InvalidFormat(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parts() {
        let email = Email::new("ann@example.com").unwrap();
        assert_eq!(email.local_part(), "ann");
        assert_eq!(email.domain(), "example.com");
    }
}
