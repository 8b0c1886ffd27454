//! Append-only consent ledger.
//!
//! Every consent-affecting event — opt-in at a gate, unsubscribe, bounce —
//! is one immutable entry keyed by contact. There is no update or delete:
//! the full chronological timeline is the audit record.
//!
//! Which ledger actions a visitor's submitted flags translate to is decided
//! by a [`ConsentPolicy`], not hard-wired: the same engine serves a
//! single-opt-in deployment and a dual-brand one.

pub mod error;
pub mod ledger;
pub mod policy;

pub use error::ConsentError;
pub use ledger::ConsentLedger;
pub use policy::ConsentPolicy;
