//! Cryptographic primitives for the fangate engine.
//!
//! - **OsRng** for unguessable token values and identifiers
//! - **Blake2b-256** for token fingerprints (single-use secrets are stored
//!   keyed by fingerprint, never by raw value)

pub mod hash;
pub mod token;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use token::{generate_id_bytes, generate_token_value, token_fingerprint};
