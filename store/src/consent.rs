//! Consent ledger storage — append-only by construction.

use crate::StoreError;
use fangate_types::{ContactId, EntryId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Consent flags as submitted by a visitor, keyed by grant name
/// (e.g. `"marketing"`, `"partner"`).
///
/// The engine carries these as opaque data; the consent policy decides which
/// ledger actions they translate to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentGrants(pub BTreeMap<String, bool>);

impl ConsentGrants {
    pub fn single(granted: bool) -> Self {
        Self(BTreeMap::from([("marketing".to_string(), granted)]))
    }

    pub fn granted(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }
}

/// A consent-affecting action, tagged by kind.
///
/// New kinds can be added without touching readers; unknown detail lives in
/// the entry's extension metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConsentAction {
    Subscribed { source: String },
    Unsubscribed,
    Resubscribed,
    Bounced,
    Complained,
}

impl ConsentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentAction::Subscribed { .. } => "subscribed",
            ConsentAction::Unsubscribed => "unsubscribed",
            ConsentAction::Resubscribed => "resubscribed",
            ConsentAction::Bounced => "bounced",
            ConsentAction::Complained => "complained",
        }
    }
}

/// One immutable line in a contact's consent timeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentEntry {
    pub id: EntryId,
    pub contact: ContactId,
    pub action: ConsentAction,
    pub timestamp: Timestamp,
    /// Where the action originated (gate slug, import batch, webhook, ...).
    pub source: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Bounded extension fields for forward compatibility.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Trait for consent ledger storage.
///
/// Deliberately has no update or delete operation — the timeline is the
/// audit record.
pub trait ConsentStore: Send + Sync {
    fn append(&self, entry: &ConsentEntry) -> Result<(), StoreError>;

    /// Full timeline for a contact, ordered by timestamp ascending.
    fn timeline_for(&self, contact: &ContactId) -> Result<Vec<ConsentEntry>, StoreError>;
}
