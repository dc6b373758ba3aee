//! Latest-value telemetry store
//!
//! Keeps the most recent value per (vehicle, descriptor) pair, latest-wins.
//! The store is the lookup collaborator for the vehicle tracker: on a change
//! notification the tracker reads the current value back out of the store
//! rather than from the notification itself.

use crate::tracker::ValueSource;
use crate::types::{TelemetryValue, Timestamp};
use std::collections::HashMap;

/// Latest known state of a single descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorState {
    /// Most recent value
    pub value: TelemetryValue,
    /// Engineering unit reported by the stream (e.g., "km", "%")
    pub unit: Option<String>,
    /// Wall-clock timestamp of the value, if the stream reported one
    pub timestamp: Option<Timestamp>,
}

impl DescriptorState {
    pub fn new(value: TelemetryValue) -> Self {
        Self {
            value,
            unit: None,
            timestamp: None,
        }
    }

    /// Builder method: attach a unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder method: attach a wall-clock timestamp
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// The per-vehicle latest-value store
///
/// Keyed by VIN, then by descriptor. No history is retained: each ingest
/// overwrites the previous state for that descriptor.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    data: HashMap<String, HashMap<String, DescriptorState>>,
}

impl TelemetryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Ingest a live value, overwriting any previous state
    pub fn ingest(&mut self, vin: &str, descriptor: &str, state: DescriptorState) {
        self.data
            .entry(vin.to_string())
            .or_default()
            .insert(descriptor.to_string(), state);
    }

    /// Seed a restored value, only if nothing is known yet
    ///
    /// Restoration runs at startup and must never clobber data that already
    /// arrived from the live stream.
    pub fn restore(&mut self, vin: &str, descriptor: &str, state: DescriptorState) {
        self.data
            .entry(vin.to_string())
            .or_default()
            .entry(descriptor.to_string())
            .or_insert(state);
    }

    /// Latest state for a descriptor, if any
    pub fn get(&self, vin: &str, descriptor: &str) -> Option<&DescriptorState> {
        self.data.get(vin).and_then(|d| d.get(descriptor))
    }

    /// All VINs known to the store
    pub fn vins(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// All descriptors known for a vehicle
    pub fn iter_descriptors(&self, vin: &str) -> impl Iterator<Item = &str> {
        self.data
            .get(vin)
            .into_iter()
            .flat_map(|d| d.keys().map(String::as_str))
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            num_vehicles: self.data.len(),
            num_descriptors: self.data.values().map(|d| d.len()).sum(),
        }
    }
}

impl ValueSource for TelemetryStore {
    fn latest_value(&self, vin: &str, descriptor: &str) -> Option<TelemetryValue> {
        self.get(vin, descriptor).map(|state| state.value.clone())
    }
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of vehicles with at least one value
    pub num_vehicles: usize,
    /// Total number of descriptor states across all vehicles
    pub num_descriptors: usize,
}
