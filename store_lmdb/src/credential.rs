//! LMDB implementation of CredentialStore.

use crate::environment::LmdbStore;
use crate::error::backend;
use fangate_store::{CredentialStore, DownloadCredential, StoreError};

impl CredentialStore for LmdbStore {
    fn put_credential(&self, credential: &DownloadCredential) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        self.credentials
            .put(&mut wtxn, credential.fingerprint.as_slice(), credential)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn get_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.credentials
            .get(&rtxn, fingerprint.as_slice())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound("download credential".into()))
    }

    fn claim_credential(&self, fingerprint: &[u8; 32]) -> Result<DownloadCredential, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut credential = self
            .credentials
            .get(&wtxn, fingerprint.as_slice())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound("download credential".into()))?;
        if credential.used {
            return Err(StoreError::PreconditionFailed(
                "credential already used".into(),
            ));
        }
        credential.used = true;
        self.credentials
            .put(&mut wtxn, fingerprint.as_slice(), &credential)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(credential)
    }
}
