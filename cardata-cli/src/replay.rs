//! Telemetry event replay engine
//!
//! Feeds recorded telemetry events through the store and per-vehicle
//! trackers, standing in for the live stream host. Events are JSON Lines,
//! one object per line:
//!
//! ```json
//! {"time": "2026-08-30T10:00:00Z", "vin": "WBA...", "descriptor": "vehicle...", "value": 48.1, "unit": "deg"}
//! ```
//!
//! Monotonic arrival times are derived from the wall-clock spacing of the
//! events, anchored at the first event.

use crate::report::ReplaySummary;
use cardata_telemetry::{
    icon_for_descriptor, AcceptReason, DescriptorState, GpsFix, NullSink, Outcome, TelemetryStore,
    TelemetryValue, Timestamp, VehicleTracker,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// One recorded telemetry event
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryEvent {
    /// Wall-clock time the value was received
    pub time: Timestamp,
    /// Vehicle identification number
    pub vin: String,
    /// Telemetry signal descriptor
    pub descriptor: String,
    /// Raw value as it appeared on the stream
    pub value: TelemetryValue,
    /// Engineering unit, if the stream reported one
    #[serde(default)]
    pub unit: Option<String>,
}

/// A fix accepted during replay
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedFix {
    pub vin: String,
    pub time: Timestamp,
    pub fix: GpsFix,
    pub reason: AcceptReason,
}

/// Replay engine: store + one tracker per vehicle
pub struct ReplayEngine {
    store: TelemetryStore,
    trackers: HashMap<String, VehicleTracker>,
    reconciler_config: cardata_telemetry::ReconcilerConfig,
    vin_filter: Option<Vec<String>>,
    /// Wall-clock anchor for deriving monotonic seconds
    epoch: Option<Timestamp>,
    /// Icon classification per descriptor, recorded on first sight
    icons: BTreeMap<String, Option<&'static str>>,
    summary: ReplaySummary,
}

impl ReplayEngine {
    pub fn new(
        reconciler_config: cardata_telemetry::ReconcilerConfig,
        vin_filter: Option<Vec<String>>,
    ) -> Self {
        Self {
            store: TelemetryStore::new(),
            trackers: HashMap::new(),
            reconciler_config,
            vin_filter,
            epoch: None,
            icons: BTreeMap::new(),
            summary: ReplaySummary::default(),
        }
    }

    /// Seed a persisted location for a vehicle before replay starts
    pub fn seed_location(&mut self, vin: &str, latitude: f64, longitude: f64) {
        self.tracker_for(vin).restore_location(latitude, longitude);
        self.store.restore(
            vin,
            cardata_telemetry::LATITUDE_DESCRIPTOR,
            DescriptorState::new(TelemetryValue::Float(latitude)),
        );
        self.store.restore(
            vin,
            cardata_telemetry::LONGITUDE_DESCRIPTOR,
            DescriptorState::new(TelemetryValue::Float(longitude)),
        );
    }

    /// Process one line of a JSONL event log
    ///
    /// Malformed lines are counted and logged, never fatal. Returns the
    /// accepted fix when the line led to a publish.
    pub fn process_line(&mut self, line: &str) -> Option<AcceptedFix> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        match serde_json::from_str::<TelemetryEvent>(trimmed) {
            Ok(event) => self.process_event(event),
            Err(e) => {
                log::warn!("Skipping malformed event line: {}", e);
                self.summary.parse_failures += 1;
                None
            }
        }
    }

    /// Process one parsed telemetry event
    pub fn process_event(&mut self, event: TelemetryEvent) -> Option<AcceptedFix> {
        self.summary.events += 1;

        if let Some(filter) = &self.vin_filter {
            if !filter.contains(&event.vin) {
                self.summary.filtered_out += 1;
                return None;
            }
        }

        let now = self.monotonic_seconds(event.time);

        // Record the icon classification the first time we see a descriptor
        self.icons
            .entry(event.descriptor.clone())
            .or_insert_with(|| icon_for_descriptor(Some(&event.descriptor)));

        let mut state = DescriptorState::new(event.value.clone()).with_timestamp(event.time);
        if let Some(unit) = &event.unit {
            state = state.with_unit(unit.clone());
        }
        self.store.ingest(&event.vin, &event.descriptor, state);

        // Heading is location-group but not a reconciler axis; only the
        // latitude/longitude pair is routed to the tracker
        if event.descriptor != cardata_telemetry::LATITUDE_DESCRIPTOR
            && event.descriptor != cardata_telemetry::LONGITUDE_DESCRIPTOR
        {
            return None;
        }

        // Route the change notification to the vehicle's tracker. The
        // returned outcome tells us whether to publish; the refresh sink is
        // a no-op because we read the fix back directly below.
        let config = self.reconciler_config;
        let tracker = self
            .trackers
            .entry(event.vin.clone())
            .or_insert_with(|| VehicleTracker::with_config(event.vin.clone(), config));
        let outcome =
            tracker.handle_update(&self.store, &event.vin, &event.descriptor, now, &mut NullSink);

        match outcome {
            Some(outcome) => {
                self.summary.record(&outcome);
                match outcome {
                    Outcome::Accepted { fix, reason } => Some(AcceptedFix {
                        vin: event.vin,
                        time: event.time,
                        fix,
                        reason,
                    }),
                    _ => None,
                }
            }
            None => {
                // Coordinate descriptor with an unusable value
                self.summary.unusable_values += 1;
                None
            }
        }
    }

    /// Current location of a vehicle, if one was published
    pub fn location(&self, vin: &str) -> Option<GpsFix> {
        self.trackers.get(vin).and_then(|t| t.fix())
    }

    /// Replay summary so far
    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    /// Descriptor -> icon classifications seen during replay
    pub fn icons(&self) -> &BTreeMap<String, Option<&'static str>> {
        &self.icons
    }

    /// Store statistics (vehicles / descriptors seen)
    pub fn store_stats(&self) -> cardata_telemetry::StoreStats {
        self.store.stats()
    }

    fn tracker_for(&mut self, vin: &str) -> &mut VehicleTracker {
        let config = self.reconciler_config;
        self.trackers
            .entry(vin.to_string())
            .or_insert_with(|| VehicleTracker::with_config(vin.to_string(), config))
    }

    /// Derive monotonic seconds from wall-clock spacing, anchored at the
    /// first event
    fn monotonic_seconds(&mut self, time: Timestamp) -> f64 {
        let epoch = *self.epoch.get_or_insert(time);
        (time - epoch).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardata_telemetry::ReconcilerConfig;
    use chrono::{TimeZone, Utc};

    const VIN: &str = "WBA00000000000001";

    fn event_line(secs: i64, descriptor: &str, value: f64) -> String {
        let time = Utc.with_ymd_and_hms(2026, 8, 30, 10, 0, 0).unwrap()
            + chrono::Duration::seconds(secs);
        format!(
            r#"{{"time": "{}", "vin": "{}", "descriptor": "{}", "value": {}}}"#,
            time.to_rfc3339(),
            VIN,
            descriptor,
            value
        )
    }

    #[test]
    fn test_replay_real_time_pair() {
        let mut engine = ReplayEngine::new(ReconcilerConfig::default(), None);

        let fix = engine.process_line(&event_line(
            0,
            cardata_telemetry::LATITUDE_DESCRIPTOR,
            48.10,
        ));
        assert!(fix.is_none());

        let fix = engine
            .process_line(&event_line(1, cardata_telemetry::LONGITUDE_DESCRIPTOR, 11.50))
            .unwrap();
        assert_eq!(fix.fix, GpsFix::new(48.10, 11.50));
        assert_eq!(fix.reason, AcceptReason::RealTimePair);
        assert_eq!(engine.location(VIN), Some(GpsFix::new(48.10, 11.50)));
        assert_eq!(engine.summary().real_time_pairs, 1);
    }

    #[test]
    fn test_replay_malformed_line() {
        let mut engine = ReplayEngine::new(ReconcilerConfig::default(), None);
        assert!(engine.process_line("not json at all").is_none());
        assert!(engine.process_line("").is_none());
        assert_eq!(engine.summary().parse_failures, 1);
        assert_eq!(engine.summary().events, 0);
    }

    #[test]
    fn test_replay_vin_filter() {
        let mut engine = ReplayEngine::new(
            ReconcilerConfig::default(),
            Some(vec!["SOMETHING_ELSE".to_string()]),
        );
        engine.process_line(&event_line(0, cardata_telemetry::LATITUDE_DESCRIPTOR, 48.1));
        assert_eq!(engine.summary().filtered_out, 1);
        assert_eq!(engine.store_stats().num_vehicles, 0);
    }

    #[test]
    fn test_replay_non_location_descriptor_only_feeds_store() {
        let mut engine = ReplayEngine::new(ReconcilerConfig::default(), None);
        let fix = engine.process_line(&event_line(0, "vehicle.vehicle.avgSpeed", 62.5));
        assert!(fix.is_none());
        assert_eq!(engine.store_stats().num_descriptors, 1);
        assert_eq!(
            engine.icons().get("vehicle.vehicle.avgSpeed"),
            Some(&Some("mdi:speedometer"))
        );
    }

    #[test]
    fn test_seeded_location_enables_interpolation() {
        let mut engine = ReplayEngine::new(ReconcilerConfig::default(), None);
        engine.seed_location(VIN, 48.10, 11.50);

        engine.process_line(&event_line(100, cardata_telemetry::LATITUDE_DESCRIPTOR, 48.20));
        let fix = engine
            .process_line(&event_line(110, cardata_telemetry::LONGITUDE_DESCRIPTOR, 11.50))
            .unwrap();
        let mid = (48.20_f64 + 48.10) / 2.0;
        assert_eq!(fix.fix, GpsFix::new(mid, 11.50));
        assert_eq!(fix.reason, AcceptReason::InterpolatedLatitude);
        assert_eq!(engine.summary().interpolated, 1);
    }
}
