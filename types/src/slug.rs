//! Public gate slug — the URL-safe handle a visitor reaches a gate by.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated gate slug: 1–64 lowercase alphanumerics, `-` or `_`.
///
/// Global uniqueness is enforced by the store at insert time, not here.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateSlug(String);

impl GateSlug {
    pub const MAX_LEN: usize = 64;

    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        let ok = !s.is_empty()
            && s.len() <= Self::MAX_LEN
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if ok {
            Ok(Self(s))
        } else {
            Err(TypeError::InvalidSlug(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GateSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_typical_slugs() {
        for good in ["my-new-single", "ep_2024", "x"] {
            assert!(GateSlug::new(good).is_ok());
        }
    }

    #[test]
    fn rejects_bad_slugs() {
        for bad in ["", "Has-Caps", "white space", "é", &"a".repeat(65)] {
            assert!(GateSlug::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    proptest! {
        #[test]
        fn valid_charset_always_accepted(s in "[a-z0-9_-]{1,64}") {
            prop_assert!(GateSlug::new(s).is_ok());
        }
    }
}
