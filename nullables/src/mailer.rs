//! Nullable email sender — captures outbound mail, never delivers.

use fangate_engine::{CollaboratorError, EmailSender, SendReceipt};
use fangate_types::EmailAddress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One captured outbound email.
#[derive(Clone, Debug)]
pub struct SentMail {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

/// An email sender that records instead of sending.
pub struct NullMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
}

impl NullMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// When set, every send fails with a collaborator error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for NullMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailSender for NullMailer {
    fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<SendReceipt, CollaboratorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("smtp relay down".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMail {
            to: to.clone(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(SendReceipt {
            message_id: format!("msg-{}", sent.len()),
        })
    }
}
