//! Funnel aggregation.

use fangate_store::{AnalyticsStore, Attribution, FunnelEvent, FunnelStage, StoreError};
use fangate_types::{GateId, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stage counts and derived conversions for one gate over a time window.
///
/// Conversions are basis points (10000 = 100%). A zero denominator yields 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelReport {
    pub views: u64,
    pub submissions: u64,
    pub step_verifications: u64,
    pub downloads: u64,
    pub submit_rate_bps: u32,
    pub verify_rate_bps: u32,
    pub download_rate_bps: u32,
    pub completion_rate_bps: u32,
}

/// Ratio in basis points; 0 when the denominator is 0.
fn ratio_bps(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    ((numerator as u128 * 10_000) / denominator as u128) as u32
}

/// Records funnel events and aggregates them into reports.
pub struct FunnelAnalytics {
    store: Arc<dyn AnalyticsStore>,
}

impl FunnelAnalytics {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Record one funnel event. Never fails the caller: storage errors are
    /// logged at warn and dropped.
    pub fn record(
        &self,
        gate_id: GateId,
        stage: FunnelStage,
        session_id: impl Into<String>,
        attribution: Option<Attribution>,
        now: Timestamp,
    ) {
        let event = FunnelEvent {
            gate_id,
            stage,
            session_id: session_id.into(),
            attribution,
            timestamp: now,
        };
        if let Err(e) = self.store.record_event(&event) {
            tracing::warn!(
                gate = %event.gate_id,
                stage = event.stage.as_str(),
                error = %e,
                "dropping funnel event, analytics store unavailable"
            );
        }
    }

    /// Aggregate stage counts and conversions for `[from, to]` inclusive.
    pub fn funnel(
        &self,
        gate_id: &GateId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<FunnelReport, StoreError> {
        let events = self.store.events_for_gate(gate_id, from, to)?;

        let mut views = 0u64;
        let mut submissions = 0u64;
        let mut step_verifications = 0u64;
        let mut downloads = 0u64;
        for event in &events {
            match event.stage {
                FunnelStage::View => views += 1,
                FunnelStage::Submit => submissions += 1,
                FunnelStage::StepVerified => step_verifications += 1,
                FunnelStage::Download => downloads += 1,
            }
        }

        Ok(FunnelReport {
            views,
            submissions,
            step_verifications,
            downloads,
            submit_rate_bps: ratio_bps(submissions, views),
            verify_rate_bps: ratio_bps(step_verifications, submissions),
            download_rate_bps: ratio_bps(downloads, submissions),
            completion_rate_bps: ratio_bps(downloads, views),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fangate_nullables::NullStore;

    fn gate() -> GateId {
        GateId::from_bytes([9; 16])
    }

    fn analytics() -> FunnelAnalytics {
        FunnelAnalytics::new(Arc::new(NullStore::new()))
    }

    fn record_n(a: &FunnelAnalytics, stage: FunnelStage, n: u64) {
        for i in 0..n {
            a.record(gate(), stage, format!("sess-{i}"), None, Timestamp::new(50 + i));
        }
    }

    #[test]
    fn counts_and_conversions() {
        let a = analytics();
        record_n(&a, FunnelStage::View, 10);
        record_n(&a, FunnelStage::Submit, 4);
        record_n(&a, FunnelStage::StepVerified, 3);
        record_n(&a, FunnelStage::Download, 2);

        let report = a.funnel(&gate(), Timestamp::EPOCH, Timestamp::new(1_000)).unwrap();
        assert_eq!(report.views, 10);
        assert_eq!(report.submissions, 4);
        assert_eq!(report.step_verifications, 3);
        assert_eq!(report.downloads, 2);
        assert_eq!(report.submit_rate_bps, 4_000);
        assert_eq!(report.verify_rate_bps, 7_500);
        assert_eq!(report.download_rate_bps, 5_000);
        assert_eq!(report.completion_rate_bps, 2_000);
    }

    #[test]
    fn zero_views_yields_zero_rates() {
        let a = analytics();
        let report = a.funnel(&gate(), Timestamp::EPOCH, Timestamp::new(1_000)).unwrap();
        assert_eq!(report.views, 0);
        assert_eq!(report.submit_rate_bps, 0);
        assert_eq!(report.completion_rate_bps, 0);
    }

    #[test]
    fn window_is_inclusive() {
        let a = analytics();
        a.record(gate(), FunnelStage::View, "s", None, Timestamp::new(100));
        a.record(gate(), FunnelStage::View, "s", None, Timestamp::new(200));
        a.record(gate(), FunnelStage::View, "s", None, Timestamp::new(300));

        let report = a.funnel(&gate(), Timestamp::new(100), Timestamp::new(200)).unwrap();
        assert_eq!(report.views, 2);
    }

    #[test]
    fn other_gates_do_not_leak_in() {
        let a = analytics();
        a.record(gate(), FunnelStage::View, "s", None, Timestamp::new(100));
        let other = GateId::from_bytes([8; 16]);
        a.record(other.clone(), FunnelStage::View, "s", None, Timestamp::new(100));

        let report = a.funnel(&other, Timestamp::EPOCH, Timestamp::new(1_000)).unwrap();
        assert_eq!(report.views, 1);
    }
}
