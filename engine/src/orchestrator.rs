//! Verification orchestrator — connects gates, submissions, handshakes,
//! credentials, consent, and analytics into the end-to-end unlock flow.
//!
//! Every race-sensitive transition is a single store-level conditional
//! operation: submission creation is an insert-if-absent on `(gate,
//! contact)`, handshake and credential consumption are one-shot claims, and
//! the gate download counter is an increment-with-ceiling. The orchestrator
//! never reads-then-writes around any of them.

use crate::collaborators::{Clock, EmailSender, FileResolver, ProviderVerifier};
use crate::error::EngineError;
use crate::steps::resolve_step;
use fangate_analytics::{FunnelAnalytics, FunnelReport};
use fangate_consent::{ConsentLedger, ConsentPolicy};
use fangate_crypto::{generate_id_bytes, generate_token_value, token_fingerprint};
use fangate_store::{
    AnalyticsStore, Attribution, ConsentGrants, ConsentStore, CredentialStore, DownloadCredential,
    FunnelStage, GateDefinition, GateStore, HandshakeStore, HandshakeToken, StoreError,
    SubmissionRecord, SubmissionStore,
};
use fangate_types::{
    EmailAddress, EngineParams, GateSlug, Provider, RequiredStep, StepAction, SubmissionId,
    Timestamp,
};
use std::sync::Arc;

/// Store handles the orchestrator operates over.
pub struct Stores {
    pub gates: Arc<dyn GateStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub handshakes: Arc<dyn HandshakeStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub consent: Arc<dyn ConsentStore>,
    pub analytics: Arc<dyn AnalyticsStore>,
}

/// External collaborators wired in by the composition root.
pub struct Collaborators {
    pub provider: Arc<dyn ProviderVerifier>,
    pub mailer: Arc<dyn EmailSender>,
    pub resolver: Arc<dyn FileResolver>,
    pub clock: Arc<dyn Clock>,
}

/// Input for a visitor submit.
#[derive(Clone, Debug)]
pub struct SubmitRequest {
    pub email: EmailAddress,
    pub display_name: Option<String>,
    pub consent: ConsentGrants,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: String,
    pub attribution: Option<Attribution>,
}

/// Result of a successful submit.
#[derive(Clone, Debug)]
pub struct SubmitOutcome {
    pub submission_id: SubmissionId,
    /// Provider steps the visitor still has to complete (email is already
    /// captured).
    pub required_steps: Vec<RequiredStep>,
}

/// Result of beginning a step verification.
#[derive(Clone, Debug)]
pub struct BeginOutcome {
    /// The CSRF handshake value; round-trips through the provider unchanged.
    pub handshake_value: String,
    pub redirect_url: String,
    pub expires_at: Timestamp,
}

/// A freshly issued download credential. The token value exists only here —
/// the store keeps a fingerprint.
#[derive(Clone, Debug)]
pub struct IssuedCredential {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Result of a successful redemption.
#[derive(Clone, Debug)]
pub struct RedeemedDownload {
    pub file_ref: String,
    pub location: String,
}

/// The orchestrator ties the whole unlock funnel together.
pub struct VerificationOrchestrator {
    gates: Arc<dyn GateStore>,
    submissions: Arc<dyn SubmissionStore>,
    handshakes: Arc<dyn HandshakeStore>,
    credentials: Arc<dyn CredentialStore>,
    consent: ConsentLedger,
    analytics: FunnelAnalytics,
    provider: Arc<dyn ProviderVerifier>,
    mailer: Arc<dyn EmailSender>,
    resolver: Arc<dyn FileResolver>,
    clock: Arc<dyn Clock>,
    policy: ConsentPolicy,
    params: EngineParams,
}

impl VerificationOrchestrator {
    pub fn new(
        stores: Stores,
        collaborators: Collaborators,
        policy: ConsentPolicy,
        params: EngineParams,
    ) -> Self {
        let consent = ConsentLedger::new(stores.consent, params.max_consent_metadata_fields);
        let analytics = FunnelAnalytics::new(stores.analytics);
        Self {
            gates: stores.gates,
            submissions: stores.submissions,
            handshakes: stores.handshakes,
            credentials: stores.credentials,
            consent,
            analytics,
            provider: collaborators.provider,
            mailer: collaborators.mailer,
            resolver: collaborators.resolver,
            clock: collaborators.clock,
            policy,
            params,
        }
    }

    /// Create a submission against a gate: email capture plus consent.
    ///
    /// The `(gate, contact)` uniqueness insert is atomic — two racing
    /// identical submits yield exactly one success and one
    /// [`EngineError::DuplicateSubmission`]. The confirmation email is
    /// fire-and-forget: its failure is logged, never surfaced.
    pub fn submit(
        &self,
        slug: &GateSlug,
        request: SubmitRequest,
    ) -> Result<SubmitOutcome, EngineError> {
        let now = self.clock.now();
        let gate = self.gate_by_slug(slug)?;
        let downloads = self.gates.downloads_issued(&gate.id)?;
        if !gate.is_submittable(now, downloads) {
            return Err(EngineError::GateClosed(slug.to_string()));
        }

        let record = SubmissionRecord::new(
            SubmissionId::from_bytes(generate_id_bytes()),
            gate.id.clone(),
            request.email.clone(),
            request.display_name,
            request.consent.clone(),
            request.ip.clone(),
            request.user_agent.clone(),
            now,
        );
        self.submissions
            .insert_if_absent(&record)
            .map_err(|e| match e {
                StoreError::Duplicate(_) => EngineError::DuplicateSubmission {
                    gate: slug.to_string(),
                },
                other => other.into(),
            })?;

        let source = format!("gate:{slug}");
        for entry in self.policy.entries_for_submit(&request.consent, &source) {
            self.consent
                .record(
                    record.contact.clone(),
                    entry.action,
                    source.clone(),
                    request.ip.clone(),
                    request.user_agent.clone(),
                    entry.metadata,
                    now,
                )
                .map_err(|e| match e {
                    fangate_consent::ConsentError::Store(s) => EngineError::Store(s),
                    fangate_consent::ConsentError::MetadataTooLarge { .. } => {
                        EngineError::Store(StoreError::Backend(e.to_string()))
                    }
                })?;
        }

        self.analytics.record(
            gate.id.clone(),
            FunnelStage::Submit,
            request.session_id,
            request.attribution,
            now,
        );

        let remaining: Vec<RequiredStep> = record
            .missing_steps(&gate.required_steps)
            .into_iter()
            .collect();
        self.send_confirmation(&record, &gate, &remaining);

        Ok(SubmitOutcome {
            submission_id: record.id,
            required_steps: remaining,
        })
    }

    /// Start a provider round-trip for one required step.
    ///
    /// Issues a fresh short-TTL handshake token bound to the submission and
    /// the resolved step, and hands back the provider redirect.
    pub fn begin_step_verification(
        &self,
        submission_id: &SubmissionId,
        provider: Provider,
        action: StepAction,
    ) -> Result<BeginOutcome, EngineError> {
        let now = self.clock.now();
        let submission = self.submission_by_id(submission_id)?;
        let gate = self.gate_by_id(&submission.gate_id)?;
        let step = resolve_step(
            &gate.required_steps,
            &submission.verified_steps,
            provider,
            action,
        )?;

        let value = generate_token_value();
        let token = HandshakeToken {
            fingerprint: token_fingerprint(&value),
            submission_id: submission.id.clone(),
            provider,
            action,
            step,
            used: false,
            issued_at: now,
            expires_at: now.plus(self.params.handshake_ttl_secs),
        };
        self.handshakes.put_token(&token)?;

        let redirect_url = self
            .provider
            .initiate_authorization(provider, action, &value)
            .map_err(|e| EngineError::ProviderUnavailable(e.to_string()))?;

        tracing::debug!(
            submission = %submission.id,
            step = %step,
            provider = %provider,
            "handshake issued"
        );

        Ok(BeginOutcome {
            handshake_value: value,
            redirect_url,
            expires_at: token.expires_at,
        })
    }

    /// Provider callback: claim the handshake, then check the proof.
    ///
    /// The token is consumed by the first callback attempt regardless of the
    /// verification outcome — that is what closes the CSRF window. A failed
    /// or errored proof check therefore requires a fresh
    /// [`Self::begin_step_verification`] to retry. Returns whether the step
    /// was verified.
    pub fn complete_step_verification(
        &self,
        handshake_value: &str,
        access_grant: &str,
    ) -> Result<bool, EngineError> {
        let now = self.clock.now();
        let fingerprint = token_fingerprint(handshake_value);
        let token = self
            .handshakes
            .claim_token(&fingerprint)
            .map_err(|e| match e {
                StoreError::NotFound(_) => EngineError::CsrfTokenUnknown,
                StoreError::PreconditionFailed(_) => EngineError::HandshakeReplayed,
                other => other.into(),
            })?;

        if token.is_expired(now) {
            return Err(EngineError::HandshakeExpired);
        }

        // Token is committed as used from here on; a provider failure cannot
        // be replayed with the same value.
        let verified = self
            .provider
            .check_proof(token.provider, token.action, access_grant)
            .map_err(|e| EngineError::ProviderCheckFailed(e.to_string()))?;

        if !verified {
            tracing::info!(
                submission = %token.submission_id,
                step = %token.step,
                "provider rejected proof, step stays unverified"
            );
            return Ok(false);
        }

        self.submissions
            .mark_step_verified(&token.submission_id, token.step)?;

        let submission = self.submission_by_id(&token.submission_id)?;
        self.analytics.record(
            submission.gate_id.clone(),
            FunnelStage::StepVerified,
            token.submission_id.to_string(),
            None,
            now,
        );

        Ok(true)
    }

    /// Issue a single-use download credential once every required step is
    /// verified. Gate submittability and step completion are re-checked at
    /// call time, never cached. Issuance does not reserve a download slot —
    /// the ceiling is enforced at redemption.
    pub fn issue_download_credential(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<IssuedCredential, EngineError> {
        let now = self.clock.now();
        let submission = self.submission_by_id(submission_id)?;
        let gate = self.gate_by_id(&submission.gate_id)?;
        let downloads = self.gates.downloads_issued(&gate.id)?;
        if !gate.is_submittable(now, downloads) {
            return Err(EngineError::GateClosed(gate.slug.to_string()));
        }
        let missing = submission.missing_steps(&gate.required_steps);
        if !missing.is_empty() {
            return Err(EngineError::VerificationIncomplete {
                missing: missing.into_iter().collect(),
            });
        }

        let value = generate_token_value();
        let credential = DownloadCredential {
            fingerprint: token_fingerprint(&value),
            submission_id: submission.id.clone(),
            gate_id: gate.id.clone(),
            used: false,
            issued_at: now,
            expires_at: now.plus(self.params.credential_ttl_secs),
        };
        self.credentials.put_credential(&credential)?;
        self.submissions.mark_credential_issued(&submission.id)?;

        tracing::debug!(submission = %submission.id, gate = %gate.id, "credential issued");

        Ok(IssuedCredential {
            token: value,
            expires_at: credential.expires_at,
        })
    }

    /// Redeem a credential: one-shot claim, then the atomic ceiling
    /// increment. Expiry is checked after the claim, so an expired
    /// credential is consumed by the attempt, like handshake tokens.
    pub fn redeem_credential(&self, token: &str) -> Result<RedeemedDownload, EngineError> {
        let now = self.clock.now();
        let fingerprint = token_fingerprint(token);
        let credential = self
            .credentials
            .claim_credential(&fingerprint)
            .map_err(|e| match e {
                StoreError::NotFound(_) => EngineError::CredentialUnknown,
                StoreError::PreconditionFailed(_) => EngineError::CredentialAlreadyUsed,
                other => other.into(),
            })?;

        if credential.is_expired(now) {
            return Err(EngineError::CredentialExpired);
        }

        let gate = self.gate_by_id(&credential.gate_id)?;
        self.gates
            .try_increment_downloads(&gate.id, gate.max_downloads)
            .map_err(|e| match e {
                StoreError::PreconditionFailed(_) => {
                    EngineError::DownloadLimitReached(gate.slug.to_string())
                }
                other => other.into(),
            })?;

        self.submissions
            .mark_download_completed(&credential.submission_id)?;
        self.analytics.record(
            gate.id.clone(),
            FunnelStage::Download,
            credential.submission_id.to_string(),
            None,
            now,
        );

        let location = self
            .resolver
            .resolve(&gate.file_ref)
            .map_err(|e| EngineError::FileUnavailable(e.to_string()))?;

        Ok(RedeemedDownload {
            file_ref: gate.file_ref,
            location,
        })
    }

    /// Record a gate page view (the funnel's first stage).
    pub fn record_view(
        &self,
        slug: &GateSlug,
        session_id: impl Into<String>,
        attribution: Option<Attribution>,
    ) -> Result<(), EngineError> {
        let gate = self.gate_by_slug(slug)?;
        self.analytics.record(
            gate.id,
            FunnelStage::View,
            session_id,
            attribution,
            self.clock.now(),
        );
        Ok(())
    }

    /// Aggregate funnel report for a gate over `[from, to]`.
    pub fn funnel(
        &self,
        slug: &GateSlug,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<FunnelReport, EngineError> {
        let gate = self.gate_by_slug(slug)?;
        Ok(self.analytics.funnel(&gate.id, from, to)?)
    }

    /// Consent timeline for a contact (audit surface).
    pub fn consent_timeline(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<fangate_store::ConsentEntry>, EngineError> {
        let timeline = self.consent.timeline_for(&email.contact_id()).map_err(|e| match e {
            fangate_consent::ConsentError::Store(s) => EngineError::Store(s),
            other => EngineError::Store(StoreError::Backend(other.to_string())),
        })?;
        Ok(timeline)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn send_confirmation(
        &self,
        record: &SubmissionRecord,
        gate: &GateDefinition,
        remaining: &[RequiredStep],
    ) {
        let subject = format!("You're unlocking \"{}\"", gate.title);
        let body = if remaining.is_empty() {
            format!("Thanks {}! Your download is ready.", record.email)
        } else {
            let steps: Vec<&str> = remaining.iter().map(|s| s.as_str()).collect();
            format!(
                "Thanks for your interest in \"{}\". Steps left: {}.",
                gate.title,
                steps.join(", ")
            )
        };
        if let Err(e) = self.mailer.send(&record.email, &subject, &body) {
            tracing::warn!(
                submission = %record.id,
                error = %e,
                "confirmation email failed, continuing"
            );
        }
    }

    fn gate_by_slug(&self, slug: &GateSlug) -> Result<GateDefinition, EngineError> {
        self.gates.get_by_slug(slug).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::GateNotFound(slug.to_string()),
            other => other.into(),
        })
    }

    fn gate_by_id(&self, id: &fangate_types::GateId) -> Result<GateDefinition, EngineError> {
        self.gates.get_gate(id).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::GateNotFound(id.to_string()),
            other => other.into(),
        })
    }

    fn submission_by_id(&self, id: &SubmissionId) -> Result<SubmissionRecord, EngineError> {
        self.submissions.get_submission(id).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::SubmissionNotFound(id.to_string()),
            other => other.into(),
        })
    }
}
