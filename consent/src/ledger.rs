//! The consent ledger proper.

use crate::ConsentError;
use fangate_store::{ConsentAction, ConsentEntry, ConsentStore};
use fangate_types::{ContactId, EntryId, Timestamp};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Append-only log of consent-affecting events, keyed by contact.
pub struct ConsentLedger {
    store: Arc<dyn ConsentStore>,
    /// Upper bound on extension metadata fields per entry.
    max_metadata_fields: usize,
}

impl ConsentLedger {
    pub fn new(store: Arc<dyn ConsentStore>, max_metadata_fields: usize) -> Self {
        Self {
            store,
            max_metadata_fields,
        }
    }

    /// Append one entry. No business validation rejects a consent event —
    /// only the metadata bound and storage failures can error here.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        contact: ContactId,
        action: ConsentAction,
        source: impl Into<String>,
        ip: Option<String>,
        user_agent: Option<String>,
        metadata: BTreeMap<String, Value>,
        now: Timestamp,
    ) -> Result<EntryId, ConsentError> {
        if metadata.len() > self.max_metadata_fields {
            return Err(ConsentError::MetadataTooLarge {
                fields: metadata.len(),
                max: self.max_metadata_fields,
            });
        }
        let entry = ConsentEntry {
            id: EntryId::from_bytes(fangate_crypto::generate_id_bytes()),
            contact,
            action,
            timestamp: now,
            source: source.into(),
            ip,
            user_agent,
            metadata,
        };
        self.store.append(&entry)?;
        Ok(entry.id)
    }

    /// Full chronological timeline for a contact, timestamp ascending.
    pub fn timeline_for(&self, contact: &ContactId) -> Result<Vec<ConsentEntry>, ConsentError> {
        let mut entries = self.store.timeline_for(contact)?;
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}
