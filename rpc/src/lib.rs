//! HTTP API for the fangate engine.
//!
//! Endpoints cover the whole unlock funnel:
//! - Gate view beacons and submissions
//! - Provider step begin/callback round-trips
//! - Download credential issuance and redemption
//! - Funnel reports and consent timelines
//!
//! Error responses are `{code, message}` JSON with the status derived from
//! the engine's error classification.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};
