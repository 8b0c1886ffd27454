//! Single-use token values and identifier entropy.

use rand::rngs::OsRng;
use rand::RngCore;

/// Generate an unguessable token value: 32 bytes from the OS RNG,
/// hex-encoded (64 characters).
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate the 16 random bytes backing a prefixed identifier.
pub fn generate_id_bytes() -> [u8; 16] {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Fingerprint of a token value.
///
/// Handshake tokens and download credentials are stored keyed by this hash,
/// so a database dump never contains a redeemable secret. Lookups always have
/// the presented raw value in hand.
pub fn token_fingerprint(value: &str) -> [u8; 32] {
    crate::hash::blake2b_256(value.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_values_are_64_hex_chars() {
        let v = generate_token_value();
        assert_eq!(v.len(), 64);
        assert!(v.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_values_are_unique() {
        assert_ne!(generate_token_value(), generate_token_value());
    }

    #[test]
    fn fingerprint_is_stable() {
        let v = generate_token_value();
        assert_eq!(token_fingerprint(&v), token_fingerprint(&v));
    }

    #[test]
    fn fingerprint_differs_per_value() {
        assert_ne!(token_fingerprint("a"), token_fingerprint("b"));
    }
}
