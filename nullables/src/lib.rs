//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the engine (clock, storage, provider SDKs,
//! email, file resolution) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod mailer;
pub mod provider;
pub mod resolver;
pub mod store;

pub use clock::NullClock;
pub use mailer::{NullMailer, SentMail};
pub use provider::NullProvider;
pub use resolver::NullResolver;
pub use store::NullStore;
