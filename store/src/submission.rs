//! Submission storage — one visitor's progress against a gate.

use crate::consent::ConsentGrants;
use crate::StoreError;
use fangate_types::{ContactId, EmailAddress, GateId, RequiredStep, SubmissionId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One visitor's attempt to unlock a gate.
///
/// Created on first submit, mutated only through the store's mark operations
/// as steps verify, never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub gate_id: GateId,
    /// Email as entered by the visitor.
    pub email: EmailAddress,
    /// Normalised uniqueness/consent key for this visitor.
    pub contact: ContactId,
    pub display_name: Option<String>,
    /// Consent grants as submitted; interpretation belongs to the consent
    /// policy, not to this record.
    pub consent: ConsentGrants,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Steps verified so far. Always contains `Email` (captured at submit).
    pub verified_steps: BTreeSet<RequiredStep>,
    pub credential_issued: bool,
    pub download_completed: bool,
    pub created_at: Timestamp,
}

impl SubmissionRecord {
    /// Build the record created by a fresh submit: email captured, nothing
    /// else verified.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SubmissionId,
        gate_id: GateId,
        email: EmailAddress,
        display_name: Option<String>,
        consent: ConsentGrants,
        ip: Option<String>,
        user_agent: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        let contact = email.contact_id();
        Self {
            id,
            gate_id,
            email,
            contact,
            display_name,
            consent,
            ip,
            user_agent,
            verified_steps: BTreeSet::from([RequiredStep::Email]),
            credential_issued: false,
            download_completed: false,
            created_at,
        }
    }

    /// Required steps not yet verified.
    pub fn missing_steps(&self, required: &BTreeSet<RequiredStep>) -> BTreeSet<RequiredStep> {
        required.difference(&self.verified_steps).copied().collect()
    }

    pub fn all_verified(&self, required: &BTreeSet<RequiredStep>) -> bool {
        self.missing_steps(required).is_empty()
    }

    /// Derive the funnel position of this submission.
    pub fn phase(&self, required: &BTreeSet<RequiredStep>) -> SubmissionPhase {
        if self.download_completed {
            SubmissionPhase::Redeemed
        } else if self.credential_issued {
            SubmissionPhase::CredentialIssued
        } else if self.all_verified(required) {
            SubmissionPhase::AllVerified
        } else if self.verified_steps.len() > 1 {
            SubmissionPhase::StepsPending
        } else {
            SubmissionPhase::EmailCaptured
        }
    }
}

/// Funnel position derived from a submission's flags.
///
/// A submission may sit in `EmailCaptured`/`StepsPending` indefinitely if the
/// visitor abandons the flow; only handshake tokens and credentials expire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    /// Record exists, only the email step is verified.
    EmailCaptured,
    /// At least one provider step verified, at least one still missing.
    StepsPending,
    /// Every required step verified; credential not yet issued.
    AllVerified,
    /// A download credential has been issued.
    CredentialIssued,
    /// The credential was redeemed. Terminal.
    Redeemed,
}

/// Trait for submission storage operations.
pub trait SubmissionStore: Send + Sync {
    /// Atomic conditional insert on the `(gate_id, contact)` uniqueness key.
    /// Two racing identical submits yield exactly one success; the loser gets
    /// [`StoreError::Duplicate`].
    fn insert_if_absent(&self, record: &SubmissionRecord) -> Result<(), StoreError>;

    fn get_submission(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError>;

    /// Add `step` to the verified set.
    fn mark_step_verified(&self, id: &SubmissionId, step: RequiredStep) -> Result<(), StoreError>;

    fn mark_credential_issued(&self, id: &SubmissionId) -> Result<(), StoreError>;

    fn mark_download_completed(&self, id: &SubmissionId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SubmissionRecord {
        SubmissionRecord::new(
            SubmissionId::from_bytes([2; 16]),
            GateId::from_bytes([1; 16]),
            EmailAddress::new("fan@example.com").unwrap(),
            Some("Fan".into()),
            ConsentGrants::default(),
            Some("203.0.113.9".into()),
            Some("test-agent".into()),
            Timestamp::new(10),
        )
    }

    fn required() -> BTreeSet<RequiredStep> {
        BTreeSet::from([RequiredStep::Email, RequiredStep::SocialRepost])
    }

    #[test]
    fn fresh_record_has_email_captured() {
        let r = record();
        assert_eq!(r.phase(&required()), SubmissionPhase::EmailCaptured);
        assert_eq!(
            r.missing_steps(&required()),
            BTreeSet::from([RequiredStep::SocialRepost])
        );
    }

    #[test]
    fn phase_progression() {
        let mut r = record();
        let req = BTreeSet::from([
            RequiredStep::Email,
            RequiredStep::SocialRepost,
            RequiredStep::SocialFollow,
        ]);

        r.verified_steps.insert(RequiredStep::SocialRepost);
        assert_eq!(r.phase(&req), SubmissionPhase::StepsPending);

        r.verified_steps.insert(RequiredStep::SocialFollow);
        assert_eq!(r.phase(&req), SubmissionPhase::AllVerified);

        r.credential_issued = true;
        assert_eq!(r.phase(&req), SubmissionPhase::CredentialIssued);

        r.download_completed = true;
        assert_eq!(r.phase(&req), SubmissionPhase::Redeemed);
    }

    #[test]
    fn contact_is_normalised_from_email() {
        let r = SubmissionRecord::new(
            SubmissionId::from_bytes([2; 16]),
            GateId::from_bytes([1; 16]),
            EmailAddress::new("Fan@Example.COM").unwrap(),
            None,
            ConsentGrants::default(),
            None,
            None,
            Timestamp::new(10),
        );
        assert_eq!(r.contact.as_str(), "fan@example.com");
    }
}
