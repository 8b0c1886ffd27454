//! Funnel analytics — stage counters and conversion ratios per gate.
//!
//! Recording is fire-and-forget: a storage failure is logged and swallowed,
//! never propagated into the caller's primary operation.

pub mod funnel;

pub use funnel::{FunnelAnalytics, FunnelReport};
