//! CSRF handshake token storage.

use crate::StoreError;
use fangate_types::{Provider, RequiredStep, StepAction, SubmissionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A short-lived, single-use CSRF token covering one provider round-trip.
///
/// Only the Blake2b fingerprint of the random value is stored; the raw value
/// leaves the engine exactly once, inside the provider redirect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandshakeToken {
    pub fingerprint: [u8; 32],
    pub submission_id: SubmissionId,
    pub provider: Provider,
    pub action: StepAction,
    /// Which required step a successful callback verifies.
    pub step: RequiredStep,
    pub used: bool,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl HandshakeToken {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Trait for handshake token storage.
pub trait HandshakeStore: Send + Sync {
    fn put_token(&self, token: &HandshakeToken) -> Result<(), StoreError>;

    fn get_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError>;

    /// Atomic `used:false → true` transition. Returns the token as it was at
    /// claim time. Fails with [`StoreError::NotFound`] for unknown
    /// fingerprints and [`StoreError::PreconditionFailed`] if already used —
    /// two concurrent callbacks with the same value yield exactly one
    /// success.
    fn claim_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError>;

    /// Delete tokens past their expiry (maintenance sweep; never required for
    /// correctness). Returns the number removed.
    fn purge_expired(&self, now: Timestamp) -> Result<u64, StoreError>;
}
