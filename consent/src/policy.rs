//! Consent policy — configuration, not hard-wired logic.
//!
//! Deployments disagree on what a submit's consent flags mean: some run a
//! single opt-in, some collect independent grants for two brands. The
//! orchestrator hands the submitted [`ConsentGrants`] to the configured
//! policy and appends whatever entries come back.

use fangate_store::{ConsentAction, ConsentGrants};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A ledger action plus the extension metadata to record with it.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyEntry {
    pub action: ConsentAction,
    pub metadata: BTreeMap<String, Value>,
}

/// How submitted consent grants translate to ledger entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ConsentPolicy {
    /// One boolean grant named `marketing`.
    SingleOptIn,
    /// Two independent grants, one per brand.
    DualBrand { primary: String, partner: String },
}

impl ConsentPolicy {
    pub fn single_opt_in() -> Self {
        ConsentPolicy::SingleOptIn
    }

    pub fn dual_brand(primary: impl Into<String>, partner: impl Into<String>) -> Self {
        ConsentPolicy::DualBrand {
            primary: primary.into(),
            partner: partner.into(),
        }
    }

    /// Ledger entries to append for a submit with the given grants.
    /// A submit with nothing granted produces no consent event.
    pub fn entries_for_submit(&self, grants: &ConsentGrants, source: &str) -> Vec<PolicyEntry> {
        match self {
            ConsentPolicy::SingleOptIn => {
                if grants.granted("marketing") {
                    vec![PolicyEntry {
                        action: ConsentAction::Subscribed { source: source.to_string() },
                        metadata: BTreeMap::new(),
                    }]
                } else {
                    Vec::new()
                }
            }
            ConsentPolicy::DualBrand { primary, partner } => {
                let mut entries = Vec::new();
                for brand in [primary, partner] {
                    if grants.granted(brand) {
                        entries.push(PolicyEntry {
                            action: ConsentAction::Subscribed { source: source.to_string() },
                            metadata: BTreeMap::from([(
                                "brand".to_string(),
                                Value::from(brand.clone()),
                            )]),
                        });
                    }
                }
                entries
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_opt_in_granted() {
        let policy = ConsentPolicy::single_opt_in();
        let entries = policy.entries_for_submit(&ConsentGrants::single(true), "gate:x");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].action,
            ConsentAction::Subscribed { source: "gate:x".into() }
        );
    }

    #[test]
    fn single_opt_in_declined_produces_nothing() {
        let policy = ConsentPolicy::single_opt_in();
        assert!(policy
            .entries_for_submit(&ConsentGrants::single(false), "gate:x")
            .is_empty());
    }

    #[test]
    fn dual_brand_splits_per_grant() {
        let policy = ConsentPolicy::dual_brand("label", "promoter");
        let grants = ConsentGrants(BTreeMap::from([
            ("label".to_string(), true),
            ("promoter".to_string(), false),
        ]));
        let entries = policy.entries_for_submit(&grants, "gate:x");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].metadata.get("brand"), Some(&Value::from("label")));
    }

    #[test]
    fn dual_brand_both_granted() {
        let policy = ConsentPolicy::dual_brand("label", "promoter");
        let grants = ConsentGrants(BTreeMap::from([
            ("label".to_string(), true),
            ("promoter".to_string(), true),
        ]));
        assert_eq!(policy.entries_for_submit(&grants, "gate:x").len(), 2);
    }
}
