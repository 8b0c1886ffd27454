//! LMDB implementation of AnalyticsStore.

use crate::environment::{event_key, event_prefix, LmdbStore};
use crate::error::backend;
use fangate_store::{AnalyticsStore, FunnelEvent, StoreError};
use fangate_types::{GateId, Timestamp};

impl AnalyticsStore for LmdbStore {
    fn record_event(&self, event: &FunnelEvent) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(backend)?;
        // The sequence breaks ties between events in the same second.
        let seq = self.next_seq(&mut wtxn, "event_seq").map_err(backend)?;
        let key = event_key(&event.gate_id, event.timestamp, seq);
        self.events.put(&mut wtxn, &key, event).map_err(backend)?;
        wtxn.commit().map_err(backend)?;
        Ok(())
    }

    fn events_for_gate(
        &self,
        gate: &GateId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<FunnelEvent>, StoreError> {
        let rtxn = self.env.read_txn().map_err(backend)?;
        let prefix = event_prefix(gate);
        let mut events = Vec::new();
        for item in self.events.prefix_iter(&rtxn, &prefix).map_err(backend)? {
            let (_, event) = item.map_err(backend)?;
            if event.timestamp >= from && event.timestamp <= to {
                events.push(event);
            }
        }
        Ok(events)
    }
}
