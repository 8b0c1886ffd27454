//! Download credential storage.

use crate::StoreError;
use fangate_types::{GateId, SubmissionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A single-use, time-limited grant of access to a gate's file.
///
/// Stored keyed by the Blake2b fingerprint of the random value, like
/// handshake tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadCredential {
    pub fingerprint: [u8; 32],
    pub submission_id: SubmissionId,
    pub gate_id: GateId,
    pub used: bool,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl DownloadCredential {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Trait for download credential storage.
pub trait CredentialStore: Send + Sync {
    fn put_credential(&self, credential: &DownloadCredential) -> Result<(), StoreError>;

    fn get_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError>;

    /// Atomic `used:false → true` transition; same contract as
    /// [`crate::HandshakeStore::claim_token`].
    fn claim_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError>;
}
