//! LMDB implementation of GateStore.

use crate::environment::LmdbStore;
use crate::error::backend;
use fangate_store::{GateDefinition, GateStore, StoreError};
use fangate_types::{GateId, GateSlug};

impl GateStore for LmdbStore {
    fn put_gate(&self, gate: &GateDefinition) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let slug = gate.slug.to_string();
        if let Some(existing) = self.gate_slugs.get(&wtxn, &slug).map_err(backend)? {
            if existing != gate.id.as_str() {
                return Err(StoreError::Duplicate(slug));
            }
        }
        self.gate_slugs
            .put(&mut wtxn, &slug, gate.id.as_str())
            .map_err(backend)?;
        self.gates
            .put(&mut wtxn, gate.id.as_str(), gate)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn get_gate(&self, id: &GateId) -> Result<GateDefinition, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.gates
            .get(&rtxn, id.as_str())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_by_slug(&self, slug: &GateSlug) -> Result<GateDefinition, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let id = self
            .gate_slugs
            .get(&rtxn, &slug.to_string())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;
        self.gates
            .get(&rtxn, id)
            .map_err(backend)?
            .ok_or_else(|| StoreError::Corruption(format!("slug {slug} points at missing gate")))
    }

    fn downloads_issued(&self, id: &GateId) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        Ok(self
            .gate_downloads
            .get(&rtxn, id.as_str())
            .map_err(backend)?
            .unwrap_or(0))
    }

    fn try_increment_downloads(&self, id: &GateId, max: Option<u32>) -> Result<u32, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let count = self
            .gate_downloads
            .get(&wtxn, id.as_str())
            .map_err(backend)?
            .unwrap_or(0);
        if let Some(max) = max {
            if count >= max {
                return Err(StoreError::PreconditionFailed(format!(
                    "download ceiling {max} reached for {id}"
                )));
            }
        }
        let next = count + 1;
        self.gate_downloads
            .put(&mut wtxn, id.as_str(), &next)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(next)
    }

    fn set_active(&self, id: &GateId, active: bool) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut gate = self
            .gates
            .get(&wtxn, id.as_str())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        gate.active = active;
        self.gates
            .put(&mut wtxn, id.as_str(), &gate)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }
}
