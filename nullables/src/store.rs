//! Nullable store — thread-safe in-memory storage for testing.
//!
//! Implements every fangate store trait. The conditional primitives hold the
//! relevant mutex across check and write, so their atomicity contracts hold
//! under concurrent test threads exactly as they do for a real backend.

use fangate_store::{
    AnalyticsStore, ConsentEntry, ConsentStore, CredentialStore, DownloadCredential, FunnelEvent,
    GateDefinition, GateStore, HandshakeStore, HandshakeToken, StoreError, SubmissionRecord,
    SubmissionStore,
};
use fangate_types::{ContactId, GateId, GateSlug, RequiredStep, SubmissionId, Timestamp};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Gates {
    by_id: HashMap<String, GateDefinition>,
    slug_index: HashMap<String, String>,
    downloads: HashMap<String, u32>,
}

#[derive(Default)]
struct Submissions {
    by_id: HashMap<String, SubmissionRecord>,
    unique: HashSet<(String, String)>,
}

/// An in-memory implementation of all fangate stores for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    gates: Mutex<Gates>,
    submissions: Mutex<Submissions>,
    handshakes: Mutex<HashMap<[u8; 32], HandshakeToken>>,
    credentials: Mutex<HashMap<[u8; 32], DownloadCredential>>,
    consent: Mutex<Vec<ConsentEntry>>,
    events: Mutex<Vec<FunnelEvent>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(Gates::default()),
            submissions: Mutex::new(Submissions::default()),
            handshakes: Mutex::new(HashMap::new()),
            credentials: Mutex::new(HashMap::new()),
            consent: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Number of handshake tokens currently stored, expired or not.
    pub fn handshake_count(&self) -> usize {
        self.handshakes.lock().unwrap().len()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GateStore for NullStore {
    fn put_gate(&self, gate: &GateDefinition) -> Result<(), StoreError> {
        let mut gates = self.gates.lock().unwrap();
        let slug = gate.slug.to_string();
        if let Some(existing) = gates.slug_index.get(&slug) {
            if existing != &gate.id.to_string() {
                return Err(StoreError::Duplicate(slug));
            }
        }
        gates.slug_index.insert(slug, gate.id.to_string());
        gates.by_id.insert(gate.id.to_string(), gate.clone());
        Ok(())
    }

    fn get_gate(&self, id: &GateId) -> Result<GateDefinition, StoreError> {
        self.gates
            .lock()
            .unwrap()
            .by_id
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_by_slug(&self, slug: &GateSlug) -> Result<GateDefinition, StoreError> {
        let gates = self.gates.lock().unwrap();
        gates
            .slug_index
            .get(&slug.to_string())
            .and_then(|id| gates.by_id.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    fn downloads_issued(&self, id: &GateId) -> Result<u32, StoreError> {
        Ok(self
            .gates
            .lock()
            .unwrap()
            .downloads
            .get(&id.to_string())
            .copied()
            .unwrap_or(0))
    }

    fn try_increment_downloads(&self, id: &GateId, max: Option<u32>) -> Result<u32, StoreError> {
        let mut gates = self.gates.lock().unwrap();
        let count = gates.downloads.entry(id.to_string()).or_insert(0);
        if let Some(max) = max {
            if *count >= max {
                return Err(StoreError::PreconditionFailed(format!(
                    "download ceiling {max} reached for {id}"
                )));
            }
        }
        *count += 1;
        Ok(*count)
    }

    fn set_active(&self, id: &GateId, active: bool) -> Result<(), StoreError> {
        let mut gates = self.gates.lock().unwrap();
        let gate = gates
            .by_id
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        gate.active = active;
        Ok(())
    }
}

impl SubmissionStore for NullStore {
    fn insert_if_absent(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let mut subs = self.submissions.lock().unwrap();
        let key = (record.gate_id.to_string(), record.contact.to_string());
        if !subs.unique.insert(key) {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                record.gate_id, record.contact
            )));
        }
        subs.by_id.insert(record.id.to_string(), record.clone());
        Ok(())
    }

    fn get_submission(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError> {
        self.submissions
            .lock()
            .unwrap()
            .by_id
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn mark_step_verified(&self, id: &SubmissionId, step: RequiredStep) -> Result<(), StoreError> {
        let mut subs = self.submissions.lock().unwrap();
        let record = subs
            .by_id
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.verified_steps.insert(step);
        Ok(())
    }

    fn mark_credential_issued(&self, id: &SubmissionId) -> Result<(), StoreError> {
        let mut subs = self.submissions.lock().unwrap();
        let record = subs
            .by_id
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.credential_issued = true;
        Ok(())
    }

    fn mark_download_completed(&self, id: &SubmissionId) -> Result<(), StoreError> {
        let mut subs = self.submissions.lock().unwrap();
        let record = subs
            .by_id
            .get_mut(&id.to_string())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.download_completed = true;
        Ok(())
    }
}

impl HandshakeStore for NullStore {
    fn put_token(&self, token: &HandshakeToken) -> Result<(), StoreError> {
        self.handshakes
            .lock()
            .unwrap()
            .insert(token.fingerprint, token.clone());
        Ok(())
    }

    fn get_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError> {
        self.handshakes
            .lock()
            .unwrap()
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("handshake token".into()))
    }

    fn claim_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError> {
        let mut tokens = self.handshakes.lock().unwrap();
        let token = tokens
            .get_mut(fingerprint)
            .ok_or_else(|| StoreError::NotFound("handshake token".into()))?;
        if token.used {
            return Err(StoreError::PreconditionFailed("token already used".into()));
        }
        token.used = true;
        Ok(token.clone())
    }

    fn purge_expired(&self, now: Timestamp) -> Result<u64, StoreError> {
        let mut tokens = self.handshakes.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}

impl CredentialStore for NullStore {
    fn put_credential(&self, credential: &DownloadCredential) -> Result<(), StoreError> {
        self.credentials
            .lock()
            .unwrap()
            .insert(credential.fingerprint, credential.clone());
        Ok(())
    }

    fn get_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError> {
        self.credentials
            .lock()
            .unwrap()
            .get(fingerprint)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("download credential".into()))
    }

    fn claim_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError> {
        let mut credentials = self.credentials.lock().unwrap();
        let credential = credentials
            .get_mut(fingerprint)
            .ok_or_else(|| StoreError::NotFound("download credential".into()))?;
        if credential.used {
            return Err(StoreError::PreconditionFailed(
                "credential already used".into(),
            ));
        }
        credential.used = true;
        Ok(credential.clone())
    }
}

impl ConsentStore for NullStore {
    fn append(&self, entry: &ConsentEntry) -> Result<(), StoreError> {
        self.consent.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn timeline_for(&self, contact: &ContactId) -> Result<Vec<ConsentEntry>, StoreError> {
        let mut entries: Vec<ConsentEntry> = self
            .consent
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.contact == contact)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}

impl AnalyticsStore for NullStore {
    fn record_event(&self, event: &FunnelEvent) -> Result<(), StoreError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn events_for_gate(
        &self,
        gate: &GateId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<FunnelEvent>, StoreError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.gate_id == gate && e.timestamp >= from && e.timestamp <= to)
            .cloned()
            .collect())
    }
}
