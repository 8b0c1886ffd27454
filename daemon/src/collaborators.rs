//! Built-in collaborator implementations.
//!
//! Provider SDK integration and email delivery are deployment-specific;
//! these implementations are the out-of-the-box wiring. Deployments swap in
//! their own `ProviderVerifier`/`EmailSender` at the composition root.

use fangate_engine::{
    CollaboratorError, EmailSender, FileResolver, ProviderVerifier, SendReceipt,
};
use fangate_types::{EmailAddress, Provider, StepAction};
use std::sync::atomic::{AtomicU64, Ordering};

/// Builds authorization redirects from a configured base URL and accepts any
/// non-empty access grant as proof.
pub struct PassthroughProvider {
    authorize_base: String,
}

impl PassthroughProvider {
    pub fn new(authorize_base: impl Into<String>) -> Self {
        Self {
            authorize_base: authorize_base.into(),
        }
    }
}

impl ProviderVerifier for PassthroughProvider {
    fn initiate_authorization(
        &self,
        provider: Provider,
        action: StepAction,
        state: &str,
    ) -> Result<String, CollaboratorError> {
        Ok(format!(
            "{}/{provider}/{action}/authorize?state={state}",
            self.authorize_base
        ))
    }

    fn check_proof(
        &self,
        provider: Provider,
        action: StepAction,
        access_grant: &str,
    ) -> Result<bool, CollaboratorError> {
        if access_grant.trim().is_empty() {
            return Ok(false);
        }
        tracing::debug!(%provider, %action, "accepting grant without sdk verification");
        Ok(true)
    }
}

/// Logs outbound mail instead of delivering it.
pub struct LogMailer {
    sent: AtomicU64,
}

impl LogMailer {
    pub fn new() -> Self {
        Self {
            sent: AtomicU64::new(0),
        }
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailSender for LogMailer {
    fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        _body: &str,
    ) -> Result<SendReceipt, CollaboratorError> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(to = %to, subject, "outbound email (log mailer)");
        Ok(SendReceipt {
            message_id: format!("log-{n}"),
        })
    }
}

/// Joins file references onto a configured base URL.
pub struct CdnResolver {
    base: String,
}

impl CdnResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl FileResolver for CdnResolver {
    fn resolve(&self, file_ref: &str) -> Result<String, CollaboratorError> {
        let file_ref = file_ref.trim_start_matches('/');
        if file_ref.is_empty() {
            return Err(CollaboratorError::Rejected("empty file reference".into()));
        }
        Ok(format!("{}/{}", self.base, file_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_joins_without_double_slashes() {
        let r = CdnResolver::new("https://cdn.example.com/files/");
        let url = r.resolve("/releases/single.zip").unwrap();
        assert_eq!(url, "https://cdn.example.com/files/releases/single.zip");
    }

    #[test]
    fn provider_rejects_empty_grant() {
        let p = PassthroughProvider::new("https://connect.example.com");
        assert!(!p
            .check_proof(Provider::SoundCloud, StepAction::Repost, "  ")
            .unwrap());
    }

    #[test]
    fn redirect_carries_the_state() {
        let p = PassthroughProvider::new("https://connect.example.com");
        let url = p
            .initiate_authorization(Provider::Spotify, StepAction::Connect, "abc123")
            .unwrap();
        assert_eq!(
            url,
            "https://connect.example.com/spotify/connect/authorize?state=abc123"
        );
    }
}
