//! Vehicle location tracker
//!
//! Glues the coordinate reconciler to the host environment. The tracker has
//! no dependency on any concrete platform: it reads values through the
//! [`ValueSource`] capability and signals accepted fixes through the
//! [`RefreshSink`] capability, mirroring a publish/subscribe host where the
//! notification carries no payload and the consumer re-reads current state.

use crate::config::ReconcilerConfig;
use crate::reconciler::{CoordinateReconciler, Outcome};
use crate::types::{
    CoordinateAxis, GpsFix, Monotonic, TelemetryValue, LATITUDE_DESCRIPTOR, LONGITUDE_DESCRIPTOR,
};

/// Lookup capability: latest known value for a (vehicle, descriptor) pair
pub trait ValueSource {
    fn latest_value(&self, vin: &str, descriptor: &str) -> Option<TelemetryValue>;
}

/// Publish capability: notified when a vehicle's fix changed
///
/// The notification carries no payload; the sink re-reads the tracker's
/// current latitude/longitude.
pub trait RefreshSink {
    fn refresh(&mut self, vin: &str);
}

/// A no-op sink for callers that only care about the returned outcome
pub struct NullSink;

impl RefreshSink for NullSink {
    fn refresh(&mut self, _vin: &str) {}
}

/// Per-vehicle location tracker
///
/// Owns that vehicle's reconciler exclusively; all updates for a vehicle are
/// processed sequentially on its own tracker, so there is no locking.
#[derive(Debug)]
pub struct VehicleTracker {
    vin: String,
    reconciler: CoordinateReconciler,
}

impl VehicleTracker {
    /// Create a tracker for a vehicle with default reconciler windows
    pub fn new(vin: impl Into<String>) -> Self {
        Self::with_config(vin, ReconcilerConfig::default())
    }

    /// Create a tracker with explicit reconciler windows
    pub fn with_config(vin: impl Into<String>, config: ReconcilerConfig) -> Self {
        Self {
            vin: vin.into(),
            reconciler: CoordinateReconciler::with_config(config),
        }
    }

    /// The VIN this tracker belongs to
    pub fn vin(&self) -> &str {
        &self.vin
    }

    /// Seed the last known good location, restored from persistence
    pub fn restore_location(&mut self, latitude: f64, longitude: f64) {
        log::debug!(
            "Restored last known location for {}: {}, {}",
            self.vin,
            latitude,
            longitude
        );
        self.reconciler.restore(GpsFix::new(latitude, longitude));
    }

    /// Last published latitude, if any
    pub fn latitude(&self) -> Option<f64> {
        self.reconciler.reference().map(|fix| fix.latitude)
    }

    /// Last published longitude, if any
    pub fn longitude(&self) -> Option<f64> {
        self.reconciler.reference().map(|fix| fix.longitude)
    }

    /// Last published fix, if any
    pub fn fix(&self) -> Option<GpsFix> {
        self.reconciler.reference()
    }

    /// Handle a change notification from the host
    ///
    /// Ignores notifications for other vehicles and for descriptors outside
    /// the latitude/longitude pair. The new value is read back through
    /// `source`; unparseable or missing values are skipped silently. When
    /// the reconciler accepts a fix, `sink` is asked to refresh.
    ///
    /// Returns the reconciler outcome when the notification was consumed,
    /// `None` when it was not addressed to this tracker or carried no usable
    /// value.
    pub fn handle_update<S: ValueSource, K: RefreshSink>(
        &mut self,
        source: &S,
        vin: &str,
        descriptor: &str,
        now: Monotonic,
        sink: &mut K,
    ) -> Option<Outcome> {
        if vin != self.vin {
            return None;
        }

        let axis = match descriptor {
            LATITUDE_DESCRIPTOR => CoordinateAxis::Latitude,
            LONGITUDE_DESCRIPTOR => CoordinateAxis::Longitude,
            _ => return None,
        };

        let value = match self.fetch_coordinate(source, descriptor) {
            Some(value) => value,
            None => return None,
        };

        let outcome = self.reconciler.observe(axis, value, now);
        if outcome.is_accepted() {
            sink.refresh(&self.vin);
        }
        Some(outcome)
    }

    /// Fetch a coordinate value from the source
    fn fetch_coordinate<S: ValueSource>(&self, source: &S, descriptor: &str) -> Option<f64> {
        let value = source.latest_value(&self.vin, descriptor)?;
        match value.as_f64() {
            Some(v) => Some(v),
            None => {
                log::debug!(
                    "Unable to parse coordinate for {} from descriptor {}: {}",
                    self.vin,
                    descriptor,
                    value
                );
                None
            }
        }
    }
}
