use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbError> for fangate_store::StoreError {
    fn from(e: LmdbError) -> Self {
        fangate_store::StoreError::Backend(e.to_string())
    }
}

/// Map a heed error at a store call site.
pub(crate) fn backend(e: heed::Error) -> fangate_store::StoreError {
    fangate_store::StoreError::Backend(e.to_string())
}
