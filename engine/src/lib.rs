//! Gated-download verification and credential engine.
//!
//! A visitor works through a gate's required steps — email capture, then one
//! provider round-trip per social/streaming step — and earns a single-use,
//! time-limited download credential. The orchestrator here is the only
//! component that mutates cross-entity state as a unit; all race-sensitive
//! transitions delegate to the store's atomic conditional primitives.
//!
//! The engine is synchronous request/response over injected store and
//! collaborator traits. Async lives in the rpc/daemon shell.

pub mod collaborators;
pub mod error;
pub mod orchestrator;
pub mod steps;

pub use collaborators::{
    Clock, CollaboratorError, EmailSender, FileResolver, ProviderVerifier, SendReceipt,
    SystemClock,
};
pub use error::{EngineError, ErrorKind};
pub use orchestrator::{
    BeginOutcome, Collaborators, IssuedCredential, RedeemedDownload, Stores, SubmitOutcome,
    SubmitRequest, VerificationOrchestrator,
};
