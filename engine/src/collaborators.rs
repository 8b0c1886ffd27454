//! Collaborator interfaces — everything the engine consumes but does not
//! implement.
//!
//! Provider SDKs, email delivery, and file storage live elsewhere; the
//! orchestrator sees only these narrow traits, wired in by the composition
//! root. Implementations must bound their own calls with a deadline
//! (`EngineParams::provider_timeout_secs` is the configured budget) — the
//! engine never blocks indefinitely on a collaborator.

use fangate_types::{EmailAddress, Provider, StepAction, Timestamp};
use thiserror::Error;

/// Failure of an external collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("rejected: {0}")]
    Rejected(String),
}

/// Third-party verification collaborator.
pub trait ProviderVerifier: Send + Sync {
    /// Build the redirect URL the visitor is sent to for `action` on
    /// `provider`. `state` is the handshake value and must round-trip
    /// unchanged through the provider callback.
    fn initiate_authorization(
        &self,
        provider: Provider,
        action: StepAction,
        state: &str,
    ) -> Result<String, CollaboratorError>;

    /// Check whether the action actually happened (the repost exists, the
    /// follow is in place) given the access grant from the callback.
    fn check_proof(
        &self,
        provider: Provider,
        action: StepAction,
        access_grant: &str,
    ) -> Result<bool, CollaboratorError>;
}

/// Receipt from a dispatched email.
#[derive(Clone, Debug)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Outbound email collaborator.
///
/// `send` must return promptly (queue or hand off internally); the
/// orchestrator treats it as fire-and-forget and logs failures without
/// surfacing them.
pub trait EmailSender: Send + Sync {
    fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<SendReceipt, CollaboratorError>;
}

/// Resolves a gate's file reference to a downloadable location.
pub trait FileResolver: Send + Sync {
    fn resolve(&self, file_ref: &str) -> Result<String, CollaboratorError>;
}

/// Time source. Injected so TTL behavior is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
