//! Validated email address and the contact identifier derived from it.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntactically plausible email address.
///
/// The constructor rejects obviously malformed input; deliverability is the
/// email collaborator's problem. The raw form is preserved as entered, while
/// [`EmailAddress::contact_id`] gives the normalised form used as the
/// uniqueness and consent ledger key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 254 {
            return Err(TypeError::InvalidEmail(s));
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(TypeError::InvalidEmail(s));
        };
        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(TypeError::InvalidEmail(s));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalised contact identifier: lowercased address.
    pub fn contact_id(&self) -> ContactId {
        ContactId(self.0.to_lowercase())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalised contact key: lowercased email.
///
/// Used as the `(gate, contact)` uniqueness component and as the consent
/// ledger key, so `Fan@Example.com` and `fan@example.com` are one contact.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactId(String);

impl ContactId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_address() {
        let e = EmailAddress::new("fan@example.com").unwrap();
        assert_eq!(e.as_str(), "fan@example.com");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let e = EmailAddress::new("  fan@example.com ").unwrap();
        assert_eq!(e.as_str(), "fan@example.com");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "no-at-sign", "@example.com", "fan@", "fan@nodot", "a b@example.com"] {
            assert!(EmailAddress::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn contact_id_is_case_insensitive() {
        let a = EmailAddress::new("Fan@Example.COM").unwrap();
        let b = EmailAddress::new("fan@example.com").unwrap();
        assert_eq!(a.contact_id(), b.contact_id());
    }

    proptest! {
        #[test]
        fn valid_shape_always_accepted(
            local in "[a-z0-9.+-]{1,20}",
            domain in "[a-z0-9-]{1,20}\\.[a-z]{2,6}",
        ) {
            let raw = format!("{local}@{domain}");
            prop_assert!(EmailAddress::new(raw).is_ok());
        }

        #[test]
        fn never_panics_on_arbitrary_input(s in ".*") {
            let _ = EmailAddress::new(s);
        }
    }
}
