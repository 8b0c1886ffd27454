//! Abstract storage traits for the fangate engine.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Correctness under concurrent request handlers lives entirely in the
//! conditional primitives defined here — `insert_if_absent`, `claim`
//! (used:false → true), `try_increment_downloads` (increment-with-ceiling).
//! Callers never read-then-write around them.

pub mod analytics;
pub mod consent;
pub mod credential;
pub mod error;
pub mod gate;
pub mod handshake;
pub mod submission;

pub use analytics::{AnalyticsStore, Attribution, FunnelEvent, FunnelStage};
pub use consent::{ConsentAction, ConsentEntry, ConsentGrants, ConsentStore};
pub use credential::{CredentialStore, DownloadCredential};
pub use error::StoreError;
pub use gate::{GateDefinition, GateStore};
pub use handshake::{HandshakeStore, HandshakeToken};
pub use submission::{SubmissionPhase, SubmissionRecord, SubmissionStore};
