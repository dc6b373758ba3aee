//! Core types for the CarData telemetry library
//!
//! This module defines the fundamental types shared by the telemetry store,
//! the coordinate reconciler and the vehicle tracker. Values arrive from the
//! stream loosely typed (JSON scalars); descriptors are dotted-path strings
//! identifying individual telemetry signals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp type used for stored telemetry values
pub type Timestamp = DateTime<Utc>;

/// Monotonic arrival time in seconds
///
/// The reconciler compares arrival times of latitude and longitude updates.
/// These must come from a monotonic clock (or a replayed equivalent), never
/// from wall-clock time.
pub type Monotonic = f64;

/// Result type for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Descriptor for the vehicle's current latitude
pub const LATITUDE_DESCRIPTOR: &str =
    "vehicle.cabin.infotainment.navigation.currentLocation.latitude";

/// Descriptor for the vehicle's current longitude
pub const LONGITUDE_DESCRIPTOR: &str =
    "vehicle.cabin.infotainment.navigation.currentLocation.longitude";

/// Descriptor for the vehicle's current heading
pub const HEADING_DESCRIPTOR: &str =
    "vehicle.cabin.infotainment.navigation.currentLocation.heading";

/// Check whether a descriptor belongs to the location group
///
/// Location descriptors are consumed by the vehicle tracker and should not
/// be exposed as plain telemetry readings.
pub fn is_location_descriptor(descriptor: &str) -> bool {
    descriptor == LATITUDE_DESCRIPTOR
        || descriptor == LONGITUDE_DESCRIPTOR
        || descriptor == HEADING_DESCRIPTOR
}

/// Errors that can occur during telemetry processing
///
/// The reconciler itself is infallible: malformed values degrade to "no
/// publish", never to an error. Errors only arise at the configuration
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// A raw telemetry value as delivered by the stream
///
/// CarData values arrive as JSON scalars with no schema; the variants cover
/// everything the stream is known to emit. Deserialization is untagged, so
/// `true`, `42`, `48.177` and `"PLUGGED_IN"` all map to the right variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    /// Boolean value (e.g., door open flags)
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Textual value (status enums, timestamps, or stringified numbers)
    Text(String),
}

impl TelemetryValue {
    /// Convert to a coordinate-grade float, if possible
    ///
    /// Numeric variants convert directly and text is parsed after trimming.
    /// Booleans are never coordinates and yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TelemetryValue::Integer(v) => Some(*v as f64),
            TelemetryValue::Float(v) => Some(*v),
            TelemetryValue::Boolean(_) => None,
            TelemetryValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryValue::Boolean(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            TelemetryValue::Integer(v) => write!(f, "{}", v),
            TelemetryValue::Float(v) => write!(f, "{}", v),
            TelemetryValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One of the two coordinate channels handled by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

impl fmt::Display for CoordinateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateAxis::Latitude => write!(f, "latitude"),
            CoordinateAxis::Longitude => write!(f, "longitude"),
        }
    }
}

/// A reconciled GPS fix
///
/// Also serves as the reference fix: the last pair the reconciler accepted,
/// used as the trust baseline for subsequent "has this axis changed" checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GpsFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={:.6} lon={:.6}", self.latitude, self.longitude)
    }
}
