//! LMDB environment setup and key layout.

use crate::LmdbError;
use fangate_store::{ConsentEntry, DownloadCredential, FunnelEvent, GateDefinition, HandshakeToken, SubmissionRecord};
use fangate_types::{ContactId, EntryId, GateId, Timestamp};
use heed::types::{Bytes, SerdeBincode, SerdeJson, Str};
use heed::{Database, Env, EnvOpenOptions, RwTxn};
use std::path::Path;

const MAX_DBS: u32 = 10;

/// All fangate stores backed by one LMDB environment.
///
/// Each logical store maps to a named database. LMDB has a single writer, so
/// every conditional primitive runs its check and its write inside one write
/// transaction and is atomic by construction.
pub struct LmdbStore {
    pub(crate) env: Env,
    pub(crate) gates: Database<Str, SerdeBincode<GateDefinition>>,
    /// slug → gate id, enforcing slug uniqueness at insert.
    pub(crate) gate_slugs: Database<Str, Str>,
    /// gate id → completed download count.
    pub(crate) gate_downloads: Database<Str, SerdeBincode<u32>>,
    pub(crate) submissions: Database<Str, SerdeBincode<SubmissionRecord>>,
    /// `gate\x1fcontact` → submission id, the uniqueness index.
    pub(crate) submission_index: Database<Str, Str>,
    pub(crate) handshakes: Database<Bytes, SerdeBincode<HandshakeToken>>,
    pub(crate) credentials: Database<Bytes, SerdeBincode<DownloadCredential>>,
    /// `contact\x1f{timestamp:020}\x1f{entry}` → entry; prefix scans give a
    /// contact's timeline in timestamp order. JSON-encoded: the internally
    /// tagged `ConsentAction` and the `serde_json::Value` metadata are not
    /// representable in bincode.
    pub(crate) consent: Database<Str, SerdeJson<ConsentEntry>>,
    /// `gate\x1f{timestamp:020}\x1f{seq:020}` → event.
    pub(crate) events: Database<Str, SerdeBincode<FunnelEvent>>,
    pub(crate) meta: Database<Str, SerdeBincode<u64>>,
}

impl LmdbStore {
    /// Open or create the environment at `path` with the given map size.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // Safety contract of EnvOpenOptions::open: the path must not be
        // opened twice in one process; the daemon opens it once.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let gates = env.create_database(&mut wtxn, Some("gates"))?;
        let gate_slugs = env.create_database(&mut wtxn, Some("gate_slugs"))?;
        let gate_downloads = env.create_database(&mut wtxn, Some("gate_downloads"))?;
        let submissions = env.create_database(&mut wtxn, Some("submissions"))?;
        let submission_index = env.create_database(&mut wtxn, Some("submission_index"))?;
        let handshakes = env.create_database(&mut wtxn, Some("handshakes"))?;
        let credentials = env.create_database(&mut wtxn, Some("credentials"))?;
        let consent = env.create_database(&mut wtxn, Some("consent"))?;
        let events = env.create_database(&mut wtxn, Some("events"))?;
        let meta = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;
        tracing::info!(path = %path.display(), "lmdb environment opened");
        Ok(Self {
            env,
            gates,
            gate_slugs,
            gate_downloads,
            submissions,
            submission_index,
            handshakes,
            credentials,
            consent,
            events,
            meta,
        })
    }

    /// Next value of a named monotonic counter, persisted in `meta`.
    pub(crate) fn next_seq(&self, wtxn: &mut RwTxn, name: &str) -> Result<u64, heed::Error> {
        let next = self.meta.get(wtxn, name)?.unwrap_or(0) + 1;
        self.meta.put(wtxn, name, &next)?;
        Ok(next)
    }
}

pub(crate) const SEP: char = '\x1f';

pub(crate) fn submission_key(gate: &GateId, contact: &ContactId) -> String {
    format!("{gate}{SEP}{contact}")
}

pub(crate) fn consent_key(contact: &ContactId, at: Timestamp, entry: &EntryId) -> String {
    format!("{contact}{SEP}{:020}{SEP}{entry}", at.as_secs())
}

pub(crate) fn consent_prefix(contact: &ContactId) -> String {
    format!("{contact}{SEP}")
}

pub(crate) fn event_key(gate: &GateId, at: Timestamp, seq: u64) -> String {
    format!("{gate}{SEP}{:020}{SEP}{seq:020}", at.as_secs())
}

pub(crate) fn event_prefix(gate: &GateId) -> String {
    format!("{gate}{SEP}")
}
