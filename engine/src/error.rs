//! Engine error taxonomy.
//!
//! Business-rule and caller errors are typed and carry a stable code; the
//! HTTP layer maps [`ErrorKind`] to a status without inspecting variants.

use fangate_store::StoreError;
use fangate_types::{Provider, RequiredStep, StepAction, TypeError};
use thiserror::Error;

/// Coarse classification of an engine error, stable across refactors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Forbidden,
    Conflict,
    Expired,
    External,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("gate not found: {0}")]
    GateNotFound(String),

    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("invalid input: {0}")]
    Validation(#[from] TypeError),

    #[error("gate {0} is not accepting submissions")]
    GateClosed(String),

    #[error("already submitted to gate {gate} with this email")]
    DuplicateSubmission { gate: String },

    #[error("no required step matches {provider}/{action} on this gate")]
    NoMatchingStep { provider: Provider, action: StepAction },

    #[error("step {step} is already verified")]
    StepAlreadyVerified { step: RequiredStep },

    #[error("unknown handshake token")]
    CsrfTokenUnknown,

    #[error("handshake token already used")]
    HandshakeReplayed,

    #[error("handshake token expired")]
    HandshakeExpired,

    #[error("provider verification failed, begin the step again: {0}")]
    ProviderCheckFailed(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("verification incomplete, missing steps: {missing:?}")]
    VerificationIncomplete { missing: Vec<RequiredStep> },

    #[error("unknown download credential")]
    CredentialUnknown,

    #[error("download credential already used")]
    CredentialAlreadyUsed,

    #[error("download credential expired")]
    CredentialExpired,

    #[error("download limit reached for gate {0}")]
    DownloadLimitReached(String),

    #[error("file reference unresolvable: {0}")]
    FileUnavailable(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::GateNotFound(_)
            | EngineError::SubmissionNotFound(_)
            | EngineError::CredentialUnknown => ErrorKind::NotFound,
            EngineError::Validation(_) | EngineError::NoMatchingStep { .. } => {
                ErrorKind::Validation
            }
            EngineError::GateClosed(_)
            | EngineError::CsrfTokenUnknown
            | EngineError::VerificationIncomplete { .. }
            | EngineError::DownloadLimitReached(_) => ErrorKind::Forbidden,
            EngineError::DuplicateSubmission { .. }
            | EngineError::StepAlreadyVerified { .. }
            | EngineError::HandshakeReplayed
            | EngineError::CredentialAlreadyUsed => ErrorKind::Conflict,
            EngineError::HandshakeExpired | EngineError::CredentialExpired => ErrorKind::Expired,
            EngineError::ProviderCheckFailed(_)
            | EngineError::ProviderUnavailable(_)
            | EngineError::FileUnavailable(_)
            | EngineError::Store(_) => ErrorKind::External,
        }
    }

    /// Stable machine-readable code for user-facing messages. Never leaks
    /// storage detail.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::GateNotFound(_) => "gate_not_found",
            EngineError::SubmissionNotFound(_) => "submission_not_found",
            EngineError::Validation(_) => "validation",
            EngineError::GateClosed(_) => "gate_closed",
            EngineError::DuplicateSubmission { .. } => "duplicate_submission",
            EngineError::NoMatchingStep { .. } => "no_matching_step",
            EngineError::StepAlreadyVerified { .. } => "step_already_verified",
            EngineError::CsrfTokenUnknown => "csrf_token_unknown",
            EngineError::HandshakeReplayed => "handshake_replayed",
            EngineError::HandshakeExpired => "handshake_expired",
            EngineError::ProviderCheckFailed(_) => "provider_check_failed",
            EngineError::ProviderUnavailable(_) => "provider_unavailable",
            EngineError::VerificationIncomplete { .. } => "verification_incomplete",
            EngineError::CredentialUnknown => "credential_unknown",
            EngineError::CredentialAlreadyUsed => "credential_already_used",
            EngineError::CredentialExpired => "credential_expired",
            EngineError::DownloadLimitReached(_) => "download_limit_reached",
            EngineError::FileUnavailable(_) => "file_unavailable",
            EngineError::Store(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(EngineError::GateNotFound("g".into()).kind(), ErrorKind::NotFound);
        assert_eq!(EngineError::HandshakeReplayed.kind(), ErrorKind::Conflict);
        assert_eq!(EngineError::HandshakeExpired.kind(), ErrorKind::Expired);
        assert_eq!(EngineError::GateClosed("g".into()).kind(), ErrorKind::Forbidden);
        assert_eq!(
            EngineError::ProviderUnavailable("down".into()).kind(),
            ErrorKind::External
        );
    }

    #[test]
    fn codes_are_stable_snake_case() {
        let e = EngineError::VerificationIncomplete { missing: vec![] };
        assert_eq!(e.code(), "verification_incomplete");
        assert!(e.code().chars().all(|c| c.is_ascii_lowercase() || c == '_'));
    }
}
