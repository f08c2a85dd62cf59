//! Numeric settings for sequence assembly.
//!
//! # Example
//!
//! ```
//! use motion_sequence::SequenceConfig;
//!
//! let config = SequenceConfig::default()
//!     .with_resolution(0.5)
//!     .with_projection_step(0.1);
//!
//! assert!(config.validate().is_empty());
//! ```

/// Smallest accepted profile grid step and projection search step.
pub const MIN_STEP: f64 = 1e-4;

/// Smallest accepted displacement-to-time search tolerance, in seconds.
pub const MIN_TIME_TOLERANCE: f64 = 1e-12;

/// Settings that control profile generation and marker projection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceConfig {
    /// Arc-length grid step used when generating path profiles.
    resolution: f64,
    /// Search step for projecting spatial markers onto paths.
    projection_step: f64,
    /// Width of the time bracket at which displacement-to-time search stops.
    time_tolerance: f64,
}

impl SequenceConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults:
    /// - Resolution: 0.25
    /// - Projection step: 0.25
    /// - Time tolerance: 1e-6 s
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resolution: 0.25,
            projection_step: 0.25,
            time_tolerance: 1e-6,
        }
    }

    /// Sets the profile grid step.
    #[must_use]
    pub const fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the spatial projection search step.
    #[must_use]
    pub const fn with_projection_step(mut self, step: f64) -> Self {
        self.projection_step = step;
        self
    }

    /// Sets the displacement-to-time search tolerance.
    #[must_use]
    pub const fn with_time_tolerance(mut self, tolerance: f64) -> Self {
        self.time_tolerance = tolerance;
        self
    }

    /// Returns the profile grid step.
    #[must_use]
    pub const fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Returns the spatial projection search step.
    #[must_use]
    pub const fn projection_step(&self) -> f64 {
        self.projection_step
    }

    /// Returns the displacement-to-time search tolerance.
    #[must_use]
    pub const fn time_tolerance(&self) -> f64 {
        self.time_tolerance
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value, min) in [
            ("resolution", self.resolution, MIN_STEP),
            ("projection_step", self.projection_step, MIN_STEP),
            ("time_tolerance", self.time_tolerance, MIN_TIME_TOLERANCE),
        ] {
            if !(value.is_finite() && value >= min) {
                issues.push(format!("{name} must be finite and at least {min}, got {value}"));
            }
        }

        issues
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self::new()
    }
}
