//! Prefixed random identifiers.
//!
//! Every aggregate gets an opaque identifier with a short type prefix
//! (`gate_`, `sub_`, `cl_`) followed by 16 random bytes hex-encoded. The
//! random bytes come from the caller (the crypto crate), keeping this crate
//! free of RNG dependencies.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! prefixed_id {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// The type prefix for this identifier.
            pub const PREFIX: &'static str = $prefix;

            /// Build an identifier from 16 random bytes.
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
            }

            /// Parse an identifier from its string form, checking the prefix
            /// and hex payload length.
            pub fn parse(raw: &str) -> Result<Self, TypeError> {
                let payload = raw
                    .strip_prefix(Self::PREFIX)
                    .ok_or_else(|| TypeError::InvalidId(raw.to_string()))?;
                if payload.len() != 32 || !payload.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(TypeError::InvalidId(raw.to_string()));
                }
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

prefixed_id!(GateId, "gate_", "Identifier of a gate definition.");
prefixed_id!(SubmissionId, "sub_", "Identifier of a visitor submission.");
prefixed_id!(EntryId, "cl_", "Identifier of a consent ledger entry.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trips_through_parse() {
        let id = GateId::from_bytes([7u8; 16]);
        let parsed = GateId::parse(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        let id = SubmissionId::from_bytes([1u8; 16]);
        assert!(GateId::parse(id.as_str()).is_err());
    }

    #[test]
    fn parse_rejects_short_payload() {
        assert!(GateId::parse("gate_abcd").is_err());
    }

    #[test]
    fn parse_rejects_non_hex_payload() {
        assert!(GateId::parse("gate_zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_err());
    }
}
