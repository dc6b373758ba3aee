//! CarData Telemetry Library
//!
//! A reusable library for processing BMW CarData vehicle telemetry: a
//! latest-value store, a per-vehicle GPS coordinate reconciler, and a
//! descriptor icon classifier.
//!
//! # Architecture
//!
//! This library is intentionally minimal and host-agnostic:
//! - Stores the latest value per (vehicle, descriptor) pair
//! - Reconciles independently-timestamped latitude/longitude updates into
//!   trustworthy fixes (real-time pairing, delayed acceptance, single-axis
//!   interpolation)
//! - Classifies descriptors to display icons via a fixed rule table
//!
//! The library does NOT:
//! - Talk to the CarData stream itself
//! - Persist state (restoration is an input, not a concern)
//! - Depend on any host automation platform
//!
//! The host side (subscription, persistence, presentation) is reached
//! through the [`tracker::ValueSource`] and [`tracker::RefreshSink`]
//! capability traits; the `cardata-cli` crate provides a file-replay host.
//!
//! # Example Usage
//!
//! ```
//! use cardata_telemetry::{CoordinateAxis, CoordinateReconciler};
//!
//! let mut reconciler = CoordinateReconciler::new();
//!
//! // Latitude and longitude arrive independently; one second apart is
//! // within the real-time window, so the pair is accepted verbatim.
//! let outcome = reconciler.observe(CoordinateAxis::Latitude, 48.10, 0.0);
//! assert!(outcome.fix().is_none());
//!
//! let outcome = reconciler.observe(CoordinateAxis::Longitude, 11.50, 1.0);
//! let fix = outcome.fix().unwrap();
//! assert_eq!((fix.latitude, fix.longitude), (48.10, 11.50));
//! ```

// Public modules
pub mod config;
pub mod icons;
pub mod reconciler;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export main types for convenience
pub use config::{ReconcilerConfig, DEFAULT_MAX_WINDOW, DEFAULT_SHORT_WINDOW};
pub use icons::icon_for_descriptor;
pub use reconciler::{AcceptReason, AxisSample, CoordinateReconciler, Outcome};
pub use store::{DescriptorState, StoreStats, TelemetryStore};
pub use tracker::{NullSink, RefreshSink, ValueSource, VehicleTracker};
pub use types::{
    is_location_descriptor, CoordinateAxis, GpsFix, Monotonic, Result, TelemetryError,
    TelemetryValue, Timestamp, HEADING_DESCRIPTOR, LATITUDE_DESCRIPTOR, LONGITUDE_DESCRIPTOR,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
