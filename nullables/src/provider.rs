//! Nullable provider verifier — scripted outcomes, no network.

use fangate_engine::{CollaboratorError, ProviderVerifier};
use fangate_types::{Provider, StepAction};
use std::sync::Mutex;

#[derive(Clone, Copy)]
enum ProofBehavior {
    Accept,
    Reject,
    Error,
}

/// A provider verifier with programmable behavior.
///
/// Accepts every proof by default; switch with [`NullProvider::reject_proofs`]
/// or [`NullProvider::error_proofs`]. Records every initiated authorization
/// for assertions.
pub struct NullProvider {
    behavior: Mutex<ProofBehavior>,
    initiated: Mutex<Vec<(Provider, StepAction, String)>>,
}

impl NullProvider {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(ProofBehavior::Accept),
            initiated: Mutex::new(Vec::new()),
        }
    }

    /// Subsequent proof checks return `Ok(false)`.
    pub fn reject_proofs(&self) {
        *self.behavior.lock().unwrap() = ProofBehavior::Reject;
    }

    /// Subsequent proof checks fail with a collaborator error.
    pub fn error_proofs(&self) {
        *self.behavior.lock().unwrap() = ProofBehavior::Error;
    }

    /// Subsequent proof checks return `Ok(true)` (the default).
    pub fn accept_proofs(&self) {
        *self.behavior.lock().unwrap() = ProofBehavior::Accept;
    }

    /// Every `(provider, action, state)` passed to `initiate_authorization`.
    pub fn initiated(&self) -> Vec<(Provider, StepAction, String)> {
        self.initiated.lock().unwrap().clone()
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderVerifier for NullProvider {
    fn initiate_authorization(
        &self,
        provider: Provider,
        action: StepAction,
        state: &str,
    ) -> Result<String, CollaboratorError> {
        self.initiated
            .lock()
            .unwrap()
            .push((provider, action, state.to_string()));
        Ok(format!(
            "https://provider.test/{provider}/{action}/authorize?state={state}"
        ))
    }

    fn check_proof(
        &self,
        _provider: Provider,
        _action: StepAction,
        _access_grant: &str,
    ) -> Result<bool, CollaboratorError> {
        match *self.behavior.lock().unwrap() {
            ProofBehavior::Accept => Ok(true),
            ProofBehavior::Reject => Ok(false),
            ProofBehavior::Error => Err(CollaboratorError::Unavailable(
                "provider api unreachable".into(),
            )),
        }
    }
}
