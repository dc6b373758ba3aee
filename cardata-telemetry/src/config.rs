//! Reconciler configuration types
//!
//! This module defines the minimal configuration needed by the reconciler.
//! The decision policy itself is fixed; only the two acceptance windows are
//! tunable, and their defaults match the production values.

use crate::types::{Result, TelemetryError};
use serde::{Deserialize, Serialize};

/// Default real-time acceptance window in seconds
pub const DEFAULT_SHORT_WINDOW: f64 = 3.0;

/// Default delayed acceptance window in seconds (3 minutes)
pub const DEFAULT_MAX_WINDOW: f64 = 180.0;

/// Configuration for the coordinate reconciler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Window within which a lat/lon pair counts as a real-time update
    #[serde(default = "default_short_window")]
    pub short_window_s: f64,

    /// Window within which a changed lat/lon pair is still accepted
    #[serde(default = "default_max_window")]
    pub max_window_s: f64,
}

fn default_short_window() -> f64 {
    DEFAULT_SHORT_WINDOW
}

fn default_max_window() -> f64 {
    DEFAULT_MAX_WINDOW
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            short_window_s: DEFAULT_SHORT_WINDOW,
            max_window_s: DEFAULT_MAX_WINDOW,
        }
    }
}

impl ReconcilerConfig {
    /// Create a new configuration with default windows
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the real-time acceptance window
    pub fn with_short_window(mut self, seconds: f64) -> Self {
        self.short_window_s = seconds;
        self
    }

    /// Builder method: set the delayed acceptance window
    pub fn with_max_window(mut self, seconds: f64) -> Self {
        self.max_window_s = seconds;
        self
    }

    /// Validate the window relationship
    pub fn validate(&self) -> Result<()> {
        if !self.short_window_s.is_finite() || self.short_window_s < 0.0 {
            return Err(TelemetryError::ConfigError(format!(
                "short window must be a non-negative number of seconds, got {}",
                self.short_window_s
            )));
        }
        if !self.max_window_s.is_finite() || self.max_window_s < self.short_window_s {
            return Err(TelemetryError::ConfigError(format!(
                "max window ({}) must be at least the short window ({})",
                self.max_window_s, self.short_window_s
            )));
        }
        Ok(())
    }
}
