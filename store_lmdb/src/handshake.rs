//! LMDB implementation of HandshakeStore.

use crate::environment::LmdbStore;
use crate::error::backend;
use fangate_store::{HandshakeStore, HandshakeToken, StoreError};
use fangate_types::Timestamp;

impl HandshakeStore for LmdbStore {
    fn put_token(&self, token: &HandshakeToken) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        self.handshakes
            .put(&mut wtxn, token.fingerprint.as_slice(), token)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn get_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        self.handshakes
            .get(&rtxn, fingerprint.as_slice())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound("handshake token".into()))
    }

    fn claim_token(&self, fingerprint: &[u8; 32]) -> Result<HandshakeToken, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut token = self
            .handshakes
            .get(&wtxn, fingerprint.as_slice())
            .map_err(backend)?
            .ok_or_else(|| StoreError::NotFound("handshake token".into()))?;
        if token.used {
            return Err(StoreError::PreconditionFailed("token already used".into()));
        }
        token.used = true;
        self.handshakes
            .put(&mut wtxn, fingerprint.as_slice(), &token)
            .map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(token)
    }

    fn purge_expired(&self, now: Timestamp) -> Result<u64, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        let mut expired = Vec::new();
        {
            let iter = self.handshakes.iter(&wtxn).map_err(backend)?;
            for item in iter {
                let (fingerprint, token) = item.map_err(backend)?;
                if token.is_expired(now) {
                    expired.push(fingerprint.to_vec());
                }
            }
        }
        for fingerprint in &expired {
            self.handshakes
                .delete(&mut wtxn, fingerprint.as_slice())
                .map_err(backend)?;
        }
        wtxn.commit().map_err(backend)?;
        Ok(expired.len() as u64)
    }
}
