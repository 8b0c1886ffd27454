//! Fundamental types for the fangate engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identifiers, validated email/slug newtypes, verification steps,
//! timestamps, engine parameters, and the shared validation error.

pub mod email;
pub mod error;
pub mod id;
pub mod params;
pub mod slug;
pub mod step;
pub mod time;

pub use email::{ContactId, EmailAddress};
pub use error::TypeError;
pub use id::{EntryId, GateId, SubmissionId};
pub use params::EngineParams;
pub use slug::GateSlug;
pub use step::{Provider, RequiredStep, StepAction};
pub use time::Timestamp;
