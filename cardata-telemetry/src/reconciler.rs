//! Coordinate reconciliation engine
//!
//! Latitude and longitude arrive on the CarData stream as two independent
//! signals with independent timing. Publishing each half-update directly
//! would make the vehicle appear to jump along one axis at a time, so this
//! module decides when the two channels can be combined into a single
//! trustworthy fix, when a stale axis should be interpolated against the
//! last accepted fix, and when an update is noise to be dropped.
//!
//! The reconciler is a pure, synchronous state machine: one instance per
//! vehicle, invoked sequentially, never failing. All degraded paths reduce
//! to "no publish".

use crate::config::ReconcilerConfig;
use crate::types::{CoordinateAxis, GpsFix, Monotonic};

/// Latest observation for a single coordinate axis
///
/// Overwritten in place on each new observation; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    /// Observed coordinate value
    pub value: f64,
    /// Monotonic arrival time of the observation, in seconds
    pub observed_at: Monotonic,
}

/// Why an observation was accepted as a published fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptReason {
    /// Both axes observed within the short window; taken verbatim
    RealTimePair,
    /// Both axes changed within the long window; taken verbatim
    DelayedPair,
    /// Longitude was the stale axis and was averaged with the reference
    InterpolatedLongitude,
    /// Latitude was the stale axis and was averaged with the reference
    InterpolatedLatitude,
}

impl AcceptReason {
    /// Short human-readable label used in log output
    pub fn label(&self) -> &'static str {
        match self {
            AcceptReason::RealTimePair => "real-time pair",
            AcceptReason::DelayedPair => "delayed valid pair",
            AcceptReason::InterpolatedLongitude => "interpolated (older lon)",
            AcceptReason::InterpolatedLatitude => "interpolated (older lat)",
        }
    }
}

/// Result of feeding one observation to the reconciler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A fix was accepted and the reference updated
    Accepted { fix: GpsFix, reason: AcceptReason },
    /// The other axis has never been observed; nothing can be published yet
    Deferred,
    /// No decision branch matched; the observation was dropped as noise
    Ignored { time_diff: f64 },
}

impl Outcome {
    /// The published fix, if this outcome accepted one
    pub fn fix(&self) -> Option<GpsFix> {
        match self {
            Outcome::Accepted { fix, .. } => Some(*fix),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }
}

/// Per-vehicle coordinate reconciler
///
/// Holds at most one sample per axis (latest-wins) and the reference fix:
/// the last accepted pair, which is only ever overwritten by a newer
/// acceptance, never rolled back.
#[derive(Debug, Clone)]
pub struct CoordinateReconciler {
    last_lat: Option<AxisSample>,
    last_lon: Option<AxisSample>,
    reference: Option<GpsFix>,
    config: ReconcilerConfig,
}

impl CoordinateReconciler {
    /// Create a reconciler with the default acceptance windows
    pub fn new() -> Self {
        Self::with_config(ReconcilerConfig::default())
    }

    /// Create a reconciler with explicit acceptance windows
    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self {
            last_lat: None,
            last_lon: None,
            reference: None,
            config,
        }
    }

    /// Seed the reference fix from a previously persisted location
    ///
    /// Called once at startup when a last known good fix was restored.
    /// Has no effect on the axis samples.
    pub fn restore(&mut self, fix: GpsFix) {
        self.reference = Some(fix);
    }

    /// The last accepted (or restored) fix, if any
    pub fn reference(&self) -> Option<GpsFix> {
        self.reference
    }

    /// Latest raw latitude sample, if any (diagnostics)
    pub fn last_latitude(&self) -> Option<AxisSample> {
        self.last_lat
    }

    /// Latest raw longitude sample, if any (diagnostics)
    pub fn last_longitude(&self) -> Option<AxisSample> {
        self.last_lon
    }

    /// Feed one coordinate observation into the reconciler
    ///
    /// Stores the sample for the given axis (overwriting any prior sample),
    /// then applies the decision policy in order, first match wins:
    ///
    /// 1. Arrival times within the short window: accept both values verbatim.
    /// 2. Within the long window, a reference exists, and both axes differ
    ///    from it: accept verbatim.
    /// 3. A reference exists and exactly one axis differs from it: keep the
    ///    newer axis, average the older axis with its reference value.
    /// 4. Otherwise: drop the update.
    ///
    /// "Differs" is exact float inequality; there is deliberately no epsilon.
    pub fn observe(
        &mut self,
        axis: CoordinateAxis,
        value: f64,
        observed_at: Monotonic,
    ) -> Outcome {
        let sample = AxisSample { value, observed_at };
        match axis {
            CoordinateAxis::Latitude => self.last_lat = Some(sample),
            CoordinateAxis::Longitude => self.last_lon = Some(sample),
        }

        // No fix possible until both axes have been observed at least once
        let (lat, lon) = match (self.last_lat, self.last_lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Outcome::Deferred,
        };

        let time_diff = (lat.observed_at - lon.observed_at).abs();

        // Near-simultaneous update: trust both values as-is
        if time_diff <= self.config.short_window_s {
            return self.accept(lat.value, lon.value, AcceptReason::RealTimePair);
        }

        // Delayed but both axes moved relative to the reference
        if let Some(reference) = self.reference {
            if time_diff <= self.config.max_window_s
                && lat.value != reference.latitude
                && lon.value != reference.longitude
            {
                return self.accept(lat.value, lon.value, AcceptReason::DelayedPair);
            }

            // Exactly one axis moved: the other one is stale, so keep the
            // newer axis and pull the older one halfway toward its reference
            let only_one_differs =
                (lat.value != reference.latitude) ^ (lon.value != reference.longitude);
            if only_one_differs {
                // Equal arrival times count as "longitude newer"
                return if lat.observed_at > lon.observed_at {
                    let interp_lon = (lon.value + reference.longitude) / 2.0;
                    self.accept(lat.value, interp_lon, AcceptReason::InterpolatedLongitude)
                } else {
                    let interp_lat = (lat.value + reference.latitude) / 2.0;
                    self.accept(interp_lat, lon.value, AcceptReason::InterpolatedLatitude)
                };
            }
        }

        log::debug!(
            "Ignored coordinate update (time diff {:.1}s, unchanged coords)",
            time_diff
        );
        Outcome::Ignored { time_diff }
    }

    /// Accept a fix: overwrite the reference and report the acceptance
    fn accept(&mut self, latitude: f64, longitude: f64, reason: AcceptReason) -> Outcome {
        let fix = GpsFix::new(latitude, longitude);
        self.reference = Some(fix);
        log::debug!("Location accepted ({}): {}", reason.label(), fix);
        Outcome::Accepted { fix, reason }
    }
}

impl Default for CoordinateReconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoordinateAxis::{Latitude, Longitude};

    #[test]
    fn test_single_axis_never_publishes() {
        let mut r = CoordinateReconciler::new();
        for t in 0..10 {
            let outcome = r.observe(Latitude, 48.1 + t as f64 * 0.01, t as f64);
            assert_eq!(outcome, Outcome::Deferred);
        }
        assert_eq!(r.reference(), None);
    }

    #[test]
    fn test_real_time_pair_accepted_verbatim() {
        let mut r = CoordinateReconciler::new();
        assert_eq!(r.observe(Latitude, 48.10, 0.0), Outcome::Deferred);
        let outcome = r.observe(Longitude, 11.50, 1.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(48.10, 11.50),
                reason: AcceptReason::RealTimePair,
            }
        );
        assert_eq!(r.reference(), Some(GpsFix::new(48.10, 11.50)));
    }

    #[test]
    fn test_short_window_boundary_inclusive() {
        let mut r = CoordinateReconciler::new();
        r.observe(Latitude, 48.10, 0.0);
        let outcome = r.observe(Longitude, 11.50, 3.0);
        assert!(outcome.is_accepted());
    }

    #[test]
    fn test_delayed_pair_requires_both_axes_changed() {
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));

        // Both changed within the long window: accepted verbatim
        r.observe(Latitude, 48.20, 100.0);
        let outcome = r.observe(Longitude, 11.60, 110.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(48.20, 11.60),
                reason: AcceptReason::DelayedPair,
            }
        );
    }

    #[test]
    fn test_delayed_branch_not_taken_beyond_max_window() {
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));

        // Both axes changed, but 200s apart: delayed branch is out, and the
        // XOR branch does not apply because both axes differ
        r.observe(Latitude, 48.20, 0.0);
        let outcome = r.observe(Longitude, 11.60, 200.0);
        assert_eq!(outcome, Outcome::Ignored { time_diff: 200.0 });
        assert_eq!(r.reference(), Some(GpsFix::new(48.10, 11.50)));
    }

    #[test]
    fn test_no_reference_blocks_delayed_and_interpolation() {
        let mut r = CoordinateReconciler::new();

        // 10s apart, no reference: neither non-real-time branch can fire
        r.observe(Latitude, 48.20, 100.0);
        let outcome = r.observe(Longitude, 11.60, 110.0);
        assert_eq!(outcome, Outcome::Ignored { time_diff: 10.0 });
    }

    #[test]
    fn test_interpolation_older_latitude() {
        // Reference (48.10, 11.50); lat 48.20 at t=100 differs,
        // lon 11.50 at t=110 unchanged. Longitude is newer, so latitude is
        // the stale axis and gets averaged with the reference. The expected
        // value is the same IEEE-754 midpoint the production code computes.
        let mid = (48.20_f64 + 48.10) / 2.0;
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));

        r.observe(Latitude, 48.20, 100.0);
        let outcome = r.observe(Longitude, 11.50, 110.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(mid, 11.50),
                reason: AcceptReason::InterpolatedLatitude,
            }
        );
        assert_eq!(r.reference(), Some(GpsFix::new(mid, 11.50)));
    }

    #[test]
    fn test_interpolation_older_longitude() {
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));

        // Longitude unchanged and older; latitude differs and is newer
        r.observe(Longitude, 11.50, 100.0);
        let outcome = r.observe(Latitude, 48.20, 110.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(48.20, 11.50),
                reason: AcceptReason::InterpolatedLongitude,
            }
        );
        // Published longitude is the mean of observed and reference, which
        // are equal here
        assert_eq!(r.reference(), Some(GpsFix::new(48.20, 11.50)));
    }

    #[test]
    fn test_equal_arrival_times_accept_as_real_time_pair() {
        let mut r = CoordinateReconciler::new();
        r.observe(Latitude, 48.20, 100.0);
        let outcome = r.observe(Longitude, 11.50, 100.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(48.20, 11.50),
                reason: AcceptReason::RealTimePair,
            }
        );
    }

    #[test]
    fn test_repeated_identical_observations_do_not_republish() {
        let mut r = CoordinateReconciler::new();
        r.observe(Latitude, 48.10, 0.0);
        assert!(r.observe(Longitude, 11.50, 1.0).is_accepted());

        // Same values again, far apart in time: neither axis differs from
        // the reference, so nothing is published
        r.observe(Latitude, 48.10, 500.0);
        let outcome = r.observe(Longitude, 11.50, 510.0);
        assert_eq!(outcome, Outcome::Ignored { time_diff: 10.0 });
        assert_eq!(r.reference(), Some(GpsFix::new(48.10, 11.50)));
    }

    #[test]
    fn test_interpolation_has_no_time_window_bound() {
        // The XOR branch is reachable even when the axes are more than
        // max_window apart, as long as exactly one axis changed
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));

        r.observe(Latitude, 48.10, 0.0);
        let outcome = r.observe(Longitude, 11.70, 400.0);
        assert_eq!(
            outcome,
            Outcome::Accepted {
                fix: GpsFix::new(48.10, 11.70),
                reason: AcceptReason::InterpolatedLatitude,
            }
        );
    }

    #[test]
    fn test_latest_sample_wins() {
        let mut r = CoordinateReconciler::new();
        r.observe(Latitude, 48.10, 0.0);
        r.observe(Latitude, 48.30, 50.0);
        assert_eq!(
            r.last_latitude(),
            Some(AxisSample {
                value: 48.30,
                observed_at: 50.0
            })
        );

        // The fix uses the latest latitude sample
        let outcome = r.observe(Longitude, 11.50, 51.0);
        assert_eq!(outcome.fix(), Some(GpsFix::new(48.30, 11.50)));
    }

    #[test]
    fn test_restore_does_not_create_samples() {
        let mut r = CoordinateReconciler::new();
        r.restore(GpsFix::new(48.10, 11.50));
        assert_eq!(r.last_latitude(), None);
        assert_eq!(r.last_longitude(), None);

        // A single observation still defers even with a restored reference
        assert_eq!(r.observe(Latitude, 48.20, 0.0), Outcome::Deferred);
    }

    #[test]
    fn test_custom_windows() {
        let config = ReconcilerConfig::new().with_short_window(0.5);
        let mut r = CoordinateReconciler::with_config(config);

        r.observe(Latitude, 48.10, 0.0);
        // 1s apart exceeds the shrunken short window and there is no
        // reference, so nothing is published
        let outcome = r.observe(Longitude, 11.50, 1.0);
        assert_eq!(outcome, Outcome::Ignored { time_diff: 1.0 });
    }
}
