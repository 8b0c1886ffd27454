//! Engine parameters — every security-sensitive window in one place.

use serde::{Deserialize, Serialize};

/// Tunable parameters for the verification engine.
///
/// Loaded from service configuration; [`EngineParams::gate_defaults`] is the
/// intended production configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineParams {
    /// Lifetime of a CSRF handshake token (seconds). A provider callback
    /// arriving after this window fails with Expired and the step stays
    /// unverified.
    pub handshake_ttl_secs: u64,

    /// Lifetime of a download credential (seconds) from issuance.
    pub credential_ttl_secs: u64,

    /// Upper bound on free-form consent metadata fields per ledger entry.
    pub max_consent_metadata_fields: usize,

    /// Deadline (seconds) provider-verification implementations must enforce
    /// on their own calls.
    pub provider_timeout_secs: u64,
}

impl EngineParams {
    /// Production defaults: 10-minute handshakes, 24-hour credentials.
    pub fn gate_defaults() -> Self {
        Self {
            handshake_ttl_secs: 10 * 60,
            credential_ttl_secs: 24 * 3600,
            max_consent_metadata_fields: 16,
            provider_timeout_secs: 10,
        }
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self::gate_defaults()
    }
}
