//! Validation errors shared across crates.

use thiserror::Error;

/// Errors raised by smart constructors in this crate.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid gate slug: {0}")]
    InvalidSlug(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid gate definition: {0}")]
    InvalidGate(String),
}
