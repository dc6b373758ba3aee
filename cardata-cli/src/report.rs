//! Replay summary reporting

use cardata_telemetry::{AcceptReason, Outcome};
use std::io::{self, Write};

/// Counters accumulated over a replay run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events parsed and processed
    pub events: usize,
    /// Lines that failed to parse as events
    pub parse_failures: usize,
    /// Events dropped by the VIN filter
    pub filtered_out: usize,
    /// Coordinate events whose value could not be used
    pub unusable_values: usize,
    /// Fixes accepted as real-time pairs
    pub real_time_pairs: usize,
    /// Fixes accepted as delayed valid pairs
    pub delayed_pairs: usize,
    /// Fixes accepted with one interpolated axis
    pub interpolated: usize,
    /// Coordinate updates dropped as noise
    pub ignored: usize,
    /// Coordinate updates waiting for the counterpart axis
    pub deferred: usize,
}

impl ReplaySummary {
    /// Total accepted fixes across all reasons
    pub fn accepted(&self) -> usize {
        self.real_time_pairs + self.delayed_pairs + self.interpolated
    }

    /// Record one reconciler outcome
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Accepted { reason, .. } => match reason {
                AcceptReason::RealTimePair => self.real_time_pairs += 1,
                AcceptReason::DelayedPair => self.delayed_pairs += 1,
                AcceptReason::InterpolatedLatitude | AcceptReason::InterpolatedLongitude => {
                    self.interpolated += 1
                }
            },
            Outcome::Ignored { .. } => self.ignored += 1,
            Outcome::Deferred => self.deferred += 1,
        }
    }

    /// Render the summary as text
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "\nReplay Summary")?;
        writeln!(out, "───────────────────────────────────────────────")?;
        writeln!(out, "  Events processed:   {}", self.events)?;
        if self.parse_failures > 0 {
            writeln!(out, "  Malformed lines:    {}", self.parse_failures)?;
        }
        if self.filtered_out > 0 {
            writeln!(out, "  Filtered out:       {}", self.filtered_out)?;
        }
        writeln!(out, "  Accepted fixes:     {}", self.accepted())?;
        writeln!(out, "    real-time pairs:  {}", self.real_time_pairs)?;
        writeln!(out, "    delayed pairs:    {}", self.delayed_pairs)?;
        writeln!(out, "    interpolated:     {}", self.interpolated)?;
        writeln!(out, "  Ignored (noise):    {}", self.ignored)?;
        writeln!(out, "  Deferred:           {}", self.deferred)?;
        if self.unusable_values > 0 {
            writeln!(out, "  Unusable values:    {}", self.unusable_values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardata_telemetry::GpsFix;

    #[test]
    fn test_record_outcomes() {
        let mut summary = ReplaySummary::default();
        summary.record(&Outcome::Deferred);
        summary.record(&Outcome::Accepted {
            fix: GpsFix::new(48.1, 11.5),
            reason: AcceptReason::RealTimePair,
        });
        summary.record(&Outcome::Accepted {
            fix: GpsFix::new(48.2, 11.6),
            reason: AcceptReason::InterpolatedLatitude,
        });
        summary.record(&Outcome::Ignored { time_diff: 10.0 });

        assert_eq!(summary.accepted(), 2);
        assert_eq!(summary.deferred, 1);
        assert_eq!(summary.ignored, 1);
    }

    #[test]
    fn test_render_smoke() {
        let summary = ReplaySummary {
            events: 10,
            real_time_pairs: 2,
            ..Default::default()
        };
        let mut buf = Vec::new();
        summary.render(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Events processed:   10"));
        assert!(text.contains("real-time pairs:  2"));
    }
}
