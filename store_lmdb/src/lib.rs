//! LMDB storage backend for the fangate engine.
//!
//! Implements all storage traits from `fangate-store` using the `heed` LMDB
//! bindings. Each logical store maps to a named database within a single
//! environment; conditional primitives run check and write inside one write
//! transaction.

pub mod analytics;
pub mod consent;
pub mod credential;
pub mod environment;
pub mod error;
pub mod gate;
pub mod handshake;
pub mod submission;

pub use environment::LmdbStore;
pub use error::LmdbError;

#[cfg(test)]
mod tests {
    use super::*;
    use fangate_store::{
        AnalyticsStore, ConsentAction, ConsentEntry, ConsentGrants, ConsentStore, CredentialStore,
        DownloadCredential, FunnelEvent, FunnelStage, GateDefinition, GateStore, HandshakeStore,
        HandshakeToken, StoreError, SubmissionRecord, SubmissionStore,
    };
    use fangate_types::{
        EmailAddress, EntryId, GateId, GateSlug, Provider, RequiredStep, StepAction, SubmissionId,
        Timestamp,
    };
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::TempDir;

    fn open() -> (TempDir, LmdbStore) {
        let dir = TempDir::new().unwrap();
        let store = LmdbStore::open(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    fn gate(n: u8, slug: &str, max: Option<u32>) -> GateDefinition {
        GateDefinition::new(
            GateId::from_bytes([n; 16]),
            "owner-1",
            GateSlug::new(slug).unwrap(),
            "My Single",
            "files/my-single.zip",
            BTreeSet::from([RequiredStep::SocialRepost]),
            None,
            max,
            Timestamp::new(1_000),
        )
        .unwrap()
    }

    fn submission(n: u8, gate: &GateDefinition, email: &str) -> SubmissionRecord {
        SubmissionRecord::new(
            SubmissionId::from_bytes([n; 16]),
            gate.id.clone(),
            EmailAddress::new(email).unwrap(),
            None,
            ConsentGrants::single(true),
            None,
            None,
            Timestamp::new(2_000),
        )
    }

    fn token(fingerprint: [u8; 32]) -> HandshakeToken {
        HandshakeToken {
            fingerprint,
            submission_id: SubmissionId::from_bytes([2; 16]),
            provider: Provider::SoundCloud,
            action: StepAction::Repost,
            step: RequiredStep::SocialRepost,
            used: false,
            issued_at: Timestamp::new(100),
            expires_at: Timestamp::new(700),
        }
    }

    #[test]
    fn gate_round_trip_and_slug_lookup() {
        let (_dir, store) = open();
        let g = gate(1, "my-single", None);
        store.put_gate(&g).unwrap();

        let by_id = store.get_gate(&g.id).unwrap();
        assert_eq!(by_id.slug, g.slug);
        let by_slug = store.get_by_slug(&g.slug).unwrap();
        assert_eq!(by_slug.id, g.id);
    }

    #[test]
    fn slug_uniqueness_is_enforced() {
        let (_dir, store) = open();
        store.put_gate(&gate(1, "my-single", None)).unwrap();
        let err = store.put_gate(&gate(2, "my-single", None));
        assert!(matches!(err, Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn reinserting_the_same_gate_is_an_update() {
        let (_dir, store) = open();
        let mut g = gate(1, "my-single", None);
        store.put_gate(&g).unwrap();
        g.title = "Renamed".into();
        store.put_gate(&g).unwrap();
        assert_eq!(store.get_gate(&g.id).unwrap().title, "Renamed");
    }

    #[test]
    fn download_counter_honors_ceiling() {
        let (_dir, store) = open();
        let g = gate(1, "limited", Some(2));
        store.put_gate(&g).unwrap();

        assert_eq!(store.downloads_issued(&g.id).unwrap(), 0);
        assert_eq!(store.try_increment_downloads(&g.id, g.max_downloads).unwrap(), 1);
        assert_eq!(store.try_increment_downloads(&g.id, g.max_downloads).unwrap(), 2);
        let err = store.try_increment_downloads(&g.id, g.max_downloads);
        assert!(matches!(err, Err(StoreError::PreconditionFailed(_))));
        assert_eq!(store.downloads_issued(&g.id).unwrap(), 2);
    }

    #[test]
    fn set_active_persists() {
        let (_dir, store) = open();
        let g = gate(1, "my-single", None);
        store.put_gate(&g).unwrap();
        store.set_active(&g.id, false).unwrap();
        assert!(!store.get_gate(&g.id).unwrap().active);
    }

    #[test]
    fn submission_uniqueness_per_gate_and_contact() {
        let (_dir, store) = open();
        let g = gate(1, "my-single", None);
        store.put_gate(&g).unwrap();

        store.insert_if_absent(&submission(10, &g, "fan@example.com")).unwrap();
        // Same contact, different id: the index key collides.
        let err = store.insert_if_absent(&submission(11, &g, "FAN@example.com"));
        assert!(matches!(err, Err(StoreError::Duplicate(_))));

        let other_gate = gate(2, "other", None);
        store.put_gate(&other_gate).unwrap();
        store
            .insert_if_absent(&submission(12, &other_gate, "fan@example.com"))
            .unwrap();
    }

    #[test]
    fn submission_marks_persist() {
        let (_dir, store) = open();
        let g = gate(1, "my-single", None);
        store.put_gate(&g).unwrap();
        let s = submission(10, &g, "fan@example.com");
        store.insert_if_absent(&s).unwrap();

        store.mark_step_verified(&s.id, RequiredStep::SocialRepost).unwrap();
        store.mark_credential_issued(&s.id).unwrap();
        store.mark_download_completed(&s.id).unwrap();

        let loaded = store.get_submission(&s.id).unwrap();
        assert!(loaded.verified_steps.contains(&RequiredStep::SocialRepost));
        assert!(loaded.credential_issued);
        assert!(loaded.download_completed);
    }

    #[test]
    fn token_claim_is_one_shot() {
        let (_dir, store) = open();
        let t = token([7; 32]);
        store.put_token(&t).unwrap();

        let claimed = store.claim_token(&t.fingerprint).unwrap();
        assert!(claimed.used);
        let err = store.claim_token(&t.fingerprint);
        assert!(matches!(err, Err(StoreError::PreconditionFailed(_))));
    }

    #[test]
    fn unknown_token_is_not_found() {
        let (_dir, store) = open();
        let err = store.claim_token(&[9; 32]);
        assert!(matches!(err, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn purge_removes_only_expired_tokens() {
        let (_dir, store) = open();
        let mut fresh = token([1; 32]);
        fresh.expires_at = Timestamp::new(10_000);
        store.put_token(&fresh).unwrap();
        store.put_token(&token([2; 32])).unwrap();
        store.put_token(&token([3; 32])).unwrap();

        let removed = store.purge_expired(Timestamp::new(700)).unwrap();
        assert_eq!(removed, 2);
        assert!(store.get_token(&[1; 32]).is_ok());
        assert!(store.get_token(&[2; 32]).is_err());
    }

    #[test]
    fn credential_claim_is_one_shot() {
        let (_dir, store) = open();
        let c = DownloadCredential {
            fingerprint: [5; 32],
            submission_id: SubmissionId::from_bytes([2; 16]),
            gate_id: GateId::from_bytes([1; 16]),
            used: false,
            issued_at: Timestamp::new(100),
            expires_at: Timestamp::new(90_000),
        };
        store.put_credential(&c).unwrap();

        assert!(store.claim_credential(&c.fingerprint).unwrap().used);
        let err = store.claim_credential(&c.fingerprint);
        assert!(matches!(err, Err(StoreError::PreconditionFailed(_))));
    }

    #[test]
    fn consent_timeline_is_ordered_and_per_contact() {
        let (_dir, store) = open();
        let contact = EmailAddress::new("fan@example.com").unwrap().contact_id();
        let other = EmailAddress::new("other@example.com").unwrap().contact_id();
        for (n, at) in [(1u8, 300u64), (2, 100), (3, 200)] {
            store
                .append(&ConsentEntry {
                    id: EntryId::from_bytes([n; 16]),
                    contact: contact.clone(),
                    action: ConsentAction::Subscribed { source: "gate:x".into() },
                    timestamp: Timestamp::new(at),
                    source: "gate:x".into(),
                    ip: None,
                    user_agent: None,
                    metadata: BTreeMap::new(),
                })
                .unwrap();
        }

        let timeline = store.timeline_for(&contact).unwrap();
        let stamps: Vec<u64> = timeline.iter().map(|e| e.timestamp.as_secs()).collect();
        assert_eq!(stamps, vec![100, 200, 300]);
        assert!(store.timeline_for(&other).unwrap().is_empty());
    }

    #[test]
    fn events_window_is_inclusive_and_per_gate() {
        let (_dir, store) = open();
        let g = GateId::from_bytes([1; 16]);
        let other = GateId::from_bytes([2; 16]);
        for (gate_id, at) in [(&g, 100u64), (&g, 200), (&g, 300), (&other, 200)] {
            store
                .record_event(&FunnelEvent {
                    gate_id: gate_id.clone(),
                    stage: FunnelStage::View,
                    session_id: "sess".into(),
                    attribution: None,
                    timestamp: Timestamp::new(at),
                })
                .unwrap();
        }

        let events = store
            .events_for_gate(&g, Timestamp::new(100), Timestamp::new(200))
            .unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let g = gate(1, "my-single", None);
        {
            let store = LmdbStore::open(dir.path(), 16 * 1024 * 1024).unwrap();
            store.put_gate(&g).unwrap();
            store.try_increment_downloads(&g.id, None).unwrap();
        }
        let store = LmdbStore::open(dir.path(), 16 * 1024 * 1024).unwrap();
        assert_eq!(store.get_by_slug(&g.slug).unwrap().id, g.id);
        assert_eq!(store.downloads_issued(&g.id).unwrap(), 1);
    }
}
