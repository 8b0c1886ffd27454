//! Funnel event storage.

use crate::StoreError;
use fangate_types::{GateId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stage of the unlock funnel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    View,
    Submit,
    StepVerified,
    Download,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::View => "view",
            FunnelStage::Submit => "submit",
            FunnelStage::StepVerified => "step_verified",
            FunnelStage::Download => "download",
        }
    }
}

/// Traffic attribution captured with an event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub referrer: Option<String>,
    pub campaign: Option<String>,
}

/// One funnel event. Used only in aggregate; never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub gate_id: GateId,
    pub stage: FunnelStage,
    pub session_id: String,
    pub attribution: Option<Attribution>,
    pub timestamp: Timestamp,
}

/// Trait for funnel event storage.
pub trait AnalyticsStore: Send + Sync {
    fn record_event(&self, event: &FunnelEvent) -> Result<(), StoreError>;

    /// Events for a gate within `[from, to]` inclusive, in insertion order.
    fn events_for_gate(
        &self,
        gate: &GateId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<FunnelEvent>, StoreError>;
}
