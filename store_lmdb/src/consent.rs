//! LMDB implementation of ConsentStore.
//!
//! Entries are keyed `contact ++ timestamp ++ entry id`, so a prefix scan
//! yields a contact's timeline already in timestamp order. There is no delete
//! path, matching the append-only trait.

use crate::environment::{consent_key, consent_prefix, LmdbStore};
use crate::error::backend;
use fangate_store::{ConsentEntry, ConsentStore, StoreError};
use fangate_types::ContactId;

impl ConsentStore for LmdbStore {
    fn append(&self, entry: &ConsentEntry) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let key = consent_key(&entry.contact, entry.timestamp, &entry.id);
        self.consent
            .put(&mut wtxn, &key, entry)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn timeline_for(&self, contact: &ContactId) -> Result<Vec<ConsentEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let prefix = consent_prefix(contact);
        let mut entries = Vec::new();
        for item in self
            .consent
            .prefix_iter(&rtxn, &prefix)
            .map_err(backend)?
        {
            let (_, entry) = item.map_err(backend)?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
