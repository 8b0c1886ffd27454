//! LMDB implementation of SubmissionStore.

use crate::environment::{submission_key, LmdbStore};
use crate::error::backend;
use fangate_store::{StoreError, SubmissionRecord, SubmissionStore};
use fangate_types::{RequiredStep, SubmissionId};

impl LmdbStore {
    fn update_submission(
        &self,
        id: &SubmissionId,
        apply: impl FnOnce(&mut SubmissionRecord),
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut record = self
            .submissions
            .get(&wtxn, id.as_str())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply(&mut record);
        self.submissions
            .put(&mut wtxn, id.as_str(), &record)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }
}

impl SubmissionStore for LmdbStore {
    fn insert_if_absent(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let key = submission_key(&record.gate_id, &record.contact);
        if self
            .submission_index
            .get(&wtxn, &key)
            .map_err(backend)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                record.gate_id, record.contact
            )));
        }
        self.submission_index
            .put(&mut wtxn, &key, record.id.as_str())
            .map_err(backend)?;
        self.submissions
            .put(&mut wtxn, record.id.as_str(), record)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn get_submission(&self, id: &SubmissionId) -> Result<SubmissionRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.submissions
            .get(&rtxn, id.as_str())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn mark_step_verified(&self, id: &SubmissionId, step: RequiredStep) -> Result<(), StoreError> {
        self.update_submission(id, |record| {
            record.verified_steps.insert(step);
        })
    }

    fn mark_credential_issued(&self, id: &SubmissionId) -> Result<(), StoreError> {
        self.update_submission(id, |record| record.credential_issued = true)
    }

    fn mark_download_completed(&self, id: &SubmissionId) -> Result<(), StoreError> {
        self.update_submission(id, |record| record.download_completed = true)
    }
}
