use proptest::prelude::*;

use fangate_types::{EmailAddress, EntryId, GateId, GateSlug, SubmissionId, Timestamp};

proptest! {
    /// GateId roundtrip: from_bytes -> as_str -> parse produces the same id.
    #[test]
    fn gate_id_roundtrip(bytes in prop::array::uniform16(0u8..)) {
        let id = GateId::from_bytes(bytes);
        prop_assert_eq!(GateId::parse(id.as_str()).unwrap(), id);
    }

    /// SubmissionId roundtrip through its string form.
    #[test]
    fn submission_id_roundtrip(bytes in prop::array::uniform16(0u8..)) {
        let id = SubmissionId::from_bytes(bytes);
        prop_assert_eq!(SubmissionId::parse(id.as_str()).unwrap(), id);
    }

    /// Ids of one kind never parse as another kind.
    #[test]
    fn id_prefixes_do_not_cross_parse(bytes in prop::array::uniform16(0u8..)) {
        let entry = EntryId::from_bytes(bytes);
        prop_assert!(GateId::parse(entry.as_str()).is_err());
        prop_assert!(SubmissionId::parse(entry.as_str()).is_err());
    }

    /// Timestamp ordering mirrors the underlying seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since(now) = now - self, saturating at zero.
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(base + offset)), offset);
        prop_assert_eq!(Timestamp::new(base + offset).elapsed_since(t), 0);
    }

    /// has_expired agrees with manual arithmetic, boundary inclusive.
    #[test]
    fn timestamp_has_expired_correct(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }

    /// plus never panics and never goes backwards.
    #[test]
    fn timestamp_plus_is_monotone(base in 0u64..u64::MAX, step in 0u64..u64::MAX) {
        let t = Timestamp::new(base);
        prop_assert!(t.plus(step) >= t);
    }

    /// Slug validity is exactly the documented charset and length.
    #[test]
    fn slug_charset_is_exact(s in "[a-z0-9_-]{1,64}") {
        prop_assert!(GateSlug::new(s).is_ok());
    }

    /// Contact ids are case-insensitive over the whole address.
    #[test]
    fn contact_id_ignores_case(local in "[a-z0-9]{1,16}", domain in "[a-z0-9]{1,16}\\.[a-z]{2,4}") {
        let lower = EmailAddress::new(format!("{local}@{domain}")).unwrap();
        let upper = EmailAddress::new(format!("{}@{}", local.to_uppercase(), domain.to_uppercase())).unwrap();
        prop_assert_eq!(lower.contact_id(), upper.contact_id());
    }
}
