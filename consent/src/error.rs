use fangate_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("metadata has {fields} fields, limit is {max}")]
    MetadataTooLarge { fields: usize, max: usize },

    #[error("consent store error: {0}")]
    Store(#[from] StoreError),
}
