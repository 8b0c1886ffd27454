//! Gate definition storage.

use crate::StoreError;
use fangate_types::{GateId, GateSlug, RequiredStep, Timestamp, TypeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration of one unlock funnel, tied to one downloadable file.
///
/// Constructed through [`GateDefinition::new`], which refuses invalid state;
/// after creation the definition is only flipped active/inactive. The
/// issued-download counter is kept by the store, not on this record, so the
/// ceiling check can be a single atomic operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateDefinition {
    pub id: GateId,
    /// Identifier of the content owner (opaque to this engine).
    pub owner: String,
    /// Public slug the gate is reached by; globally unique at insert time.
    pub slug: GateSlug,
    pub title: String,
    /// Reference to the gated file, resolved by the file collaborator.
    pub file_ref: String,
    /// Required verification steps. Always contains [`RequiredStep::Email`].
    pub required_steps: BTreeSet<RequiredStep>,
    pub active: bool,
    /// Gate stops accepting submissions at this time, if set.
    pub expires_at: Option<Timestamp>,
    /// Ceiling on completed downloads, if set. Must be non-zero.
    pub max_downloads: Option<u32>,
    pub created_at: Timestamp,
}

impl GateDefinition {
    /// Validate and build a gate definition.
    ///
    /// `Email` is inserted into the required set unconditionally — every gate
    /// captures an email.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: GateId,
        owner: impl Into<String>,
        slug: GateSlug,
        title: impl Into<String>,
        file_ref: impl Into<String>,
        mut required_steps: BTreeSet<RequiredStep>,
        expires_at: Option<Timestamp>,
        max_downloads: Option<u32>,
        created_at: Timestamp,
    ) -> Result<Self, TypeError> {
        let title = title.into();
        let file_ref = file_ref.into();
        let owner = owner.into();
        if title.trim().is_empty() {
            return Err(TypeError::InvalidGate("title must not be empty".into()));
        }
        if file_ref.trim().is_empty() {
            return Err(TypeError::InvalidGate("file reference must not be empty".into()));
        }
        if owner.trim().is_empty() {
            return Err(TypeError::InvalidGate("owner must not be empty".into()));
        }
        if max_downloads == Some(0) {
            return Err(TypeError::InvalidGate("max_downloads must be non-zero".into()));
        }
        if let Some(expiry) = expires_at {
            if expiry <= created_at {
                return Err(TypeError::InvalidGate(
                    "expiry must be after creation".into(),
                ));
            }
        }
        required_steps.insert(RequiredStep::Email);
        Ok(Self {
            id,
            owner,
            slug,
            title,
            file_ref,
            required_steps,
            active: true,
            expires_at,
            max_downloads,
            created_at,
        })
    }

    /// Whether the gate currently accepts submissions and redemptions:
    /// active, not past expiry, and under its download ceiling.
    pub fn is_submittable(&self, now: Timestamp, downloads_issued: u32) -> bool {
        if !self.active {
            return false;
        }
        if let Some(expiry) = self.expires_at {
            if now >= expiry {
                return false;
            }
        }
        if let Some(max) = self.max_downloads {
            if downloads_issued >= max {
                return false;
            }
        }
        true
    }

    /// Required steps completed through provider round-trips (everything but
    /// the email capture).
    pub fn handshake_steps(&self) -> impl Iterator<Item = RequiredStep> + '_ {
        self.required_steps
            .iter()
            .copied()
            .filter(RequiredStep::needs_handshake)
    }
}

/// Trait for gate storage operations.
pub trait GateStore: Send + Sync {
    /// Insert a new gate. Fails with [`StoreError::Duplicate`] if the slug is
    /// already taken by another gate. Uniqueness is enforced by the backend
    /// in the same operation as the insert.
    fn put_gate(&self, gate: &GateDefinition) -> Result<(), StoreError>;

    fn get_gate(&self, id: &GateId) -> Result<GateDefinition, StoreError>;

    fn get_by_slug(&self, slug: &GateSlug) -> Result<GateDefinition, StoreError>;

    /// Completed downloads issued against this gate.
    fn downloads_issued(&self, id: &GateId) -> Result<u32, StoreError>;

    /// Atomically increment the download counter, failing with
    /// [`StoreError::PreconditionFailed`] if `max` is set and already
    /// reached. Returns the new counter value. The check and the increment
    /// happen in one storage operation — this is what keeps a gate from
    /// exceeding its ceiling under racing redemptions.
    fn try_increment_downloads(&self, id: &GateId, max: Option<u32>) -> Result<u32, StoreError>;

    /// Flip the active flag.
    fn set_active(&self, id: &GateId, active: bool) -> Result<(), StoreError>;
}
