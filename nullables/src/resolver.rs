//! Nullable file resolver — deterministic locations, no storage backend.

use fangate_engine::{CollaboratorError, FileResolver};
use std::collections::HashSet;
use std::sync::Mutex;

/// Resolves file references against a fixed base URL.
///
/// References can be marked missing to exercise resolution failures.
pub struct NullResolver {
    base: String,
    missing: Mutex<HashSet<String>>,
}

impl NullResolver {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            missing: Mutex::new(HashSet::new()),
        }
    }

    /// Make `file_ref` unresolvable.
    pub fn mark_missing(&self, file_ref: impl Into<String>) {
        self.missing.lock().unwrap().insert(file_ref.into());
    }
}

impl FileResolver for NullResolver {
    fn resolve(&self, file_ref: &str) -> Result<String, CollaboratorError> {
        if self.missing.lock().unwrap().contains(file_ref) {
            return Err(CollaboratorError::Rejected(format!(
                "no such file: {file_ref}"
            )));
        }
        Ok(format!("{}/{}", self.base, file_ref))
    }
}
