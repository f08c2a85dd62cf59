//! Velocity and acceleration limits.
//!
//! This module defines the limits that motion profiles must respect:
//!
//! - [`MotionConstraints`]: Translational limits along a path
//! - [`TurnConstraints`]: Angular limits for in-place turns
//! - [`DriveConstraints`]: Both pairs together, describing a drive base
//!
//! # Example
//!
//! ```
//! use motion_types::{DriveConstraints, MotionConstraints};
//!
//! let drive = DriveConstraints::new(30.0, 30.0, 3.0, 3.0);
//! let slow = drive.motion().with_max_vel(10.0);
//!
//! assert!(slow.validate().is_empty());
//! assert!((slow.max_vel() - 10.0).abs() < 1e-12);
//! ```

/// Translational velocity and acceleration limits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionConstraints {
    /// Maximum speed along the path.
    max_vel: f64,
    /// Maximum acceleration along the path.
    max_accel: f64,
}

impl MotionConstraints {
    /// Creates translational limits.
    #[must_use]
    pub const fn new(max_vel: f64, max_accel: f64) -> Self {
        Self { max_vel, max_accel }
    }

    /// Sets the maximum speed.
    #[must_use]
    pub const fn with_max_vel(mut self, max_vel: f64) -> Self {
        self.max_vel = max_vel;
        self
    }

    /// Sets the maximum acceleration.
    #[must_use]
    pub const fn with_max_accel(mut self, max_accel: f64) -> Self {
        self.max_accel = max_accel;
        self
    }

    /// Returns the maximum speed.
    #[must_use]
    pub const fn max_vel(&self) -> f64 {
        self.max_vel
    }

    /// Returns the maximum acceleration.
    #[must_use]
    pub const fn max_accel(&self) -> f64 {
        self.max_accel
    }

    /// Returns the element-wise minimum of two constraint pairs.
    #[must_use]
    pub fn min(&self, other: &Self) -> Self {
        Self::new(
            self.max_vel.min(other.max_vel),
            self.max_accel.min(other.max_accel),
        )
    }

    /// Validates the limits.
    ///
    /// Returns a list of problems; an empty list means the limits are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        check_positive(&mut issues, "max_vel", self.max_vel);
        check_positive(&mut issues, "max_accel", self.max_accel);
        issues
    }
}

/// Angular velocity and acceleration limits for in-place turns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnConstraints {
    /// Maximum angular velocity (rad/s).
    max_ang_vel: f64,
    /// Maximum angular acceleration (rad/s²).
    max_ang_accel: f64,
}

impl TurnConstraints {
    /// Creates angular limits.
    #[must_use]
    pub const fn new(max_ang_vel: f64, max_ang_accel: f64) -> Self {
        Self {
            max_ang_vel,
            max_ang_accel,
        }
    }

    /// Returns the maximum angular velocity.
    #[must_use]
    pub const fn max_ang_vel(&self) -> f64 {
        self.max_ang_vel
    }

    /// Returns the maximum angular acceleration.
    #[must_use]
    pub const fn max_ang_accel(&self) -> f64 {
        self.max_ang_accel
    }

    /// Validates the limits.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        check_positive(&mut issues, "max_ang_vel", self.max_ang_vel);
        check_positive(&mut issues, "max_ang_accel", self.max_ang_accel);
        issues
    }
}

/// Limits for a whole drive base.
///
/// This is the single value a caller needs to describe a robot; the sequence
/// builder splits it into the translational and angular pairs it tracks.
///
/// # Example
///
/// ```
/// use motion_types::DriveConstraints;
/// use std::f64::consts::PI;
///
/// let drive = DriveConstraints::new(60.0, 60.0, PI, PI);
/// assert!(drive.validate().is_empty());
///
/// let broken = DriveConstraints::new(-1.0, 60.0, PI, 0.0);
/// assert_eq!(broken.validate().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveConstraints {
    max_vel: f64,
    max_accel: f64,
    max_ang_vel: f64,
    max_ang_accel: f64,
}

impl DriveConstraints {
    /// Creates drive limits.
    #[must_use]
    pub const fn new(max_vel: f64, max_accel: f64, max_ang_vel: f64, max_ang_accel: f64) -> Self {
        Self {
            max_vel,
            max_accel,
            max_ang_vel,
            max_ang_accel,
        }
    }

    /// Returns the translational limits.
    #[must_use]
    pub const fn motion(&self) -> MotionConstraints {
        MotionConstraints::new(self.max_vel, self.max_accel)
    }

    /// Returns the angular limits.
    #[must_use]
    pub const fn turn(&self) -> TurnConstraints {
        TurnConstraints::new(self.max_ang_vel, self.max_ang_accel)
    }

    /// Validates all four limits.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.motion().validate();
        issues.extend(self.turn().validate());
        issues
    }
}

impl Default for DriveConstraints {
    /// Limits of a typical small competition robot, in inches and radians.
    fn default() -> Self {
        Self::new(60.0, 60.0, 60f64.to_radians() * 3.0, 60f64.to_radians() * 3.0)
    }
}

fn check_positive(issues: &mut Vec<String>, name: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        issues.push(format!("{name} must be positive and finite, got {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_motion_constraints_builders() {
        let c = MotionConstraints::new(10.0, 5.0)
            .with_max_vel(20.0)
            .with_max_accel(8.0);
        assert_relative_eq!(c.max_vel(), 20.0);
        assert_relative_eq!(c.max_accel(), 8.0);
    }

    #[test]
    fn test_motion_constraints_min() {
        let a = MotionConstraints::new(10.0, 50.0);
        let b = MotionConstraints::new(30.0, 5.0);
        let m = a.min(&b);
        assert_relative_eq!(m.max_vel(), 10.0);
        assert_relative_eq!(m.max_accel(), 5.0);
    }

    #[test]
    fn test_validate_rejects_nonpositive() {
        assert_eq!(MotionConstraints::new(0.0, 1.0).validate().len(), 1);
        assert_eq!(MotionConstraints::new(f64::NAN, -1.0).validate().len(), 2);
        assert_eq!(TurnConstraints::new(1.0, f64::INFINITY).validate().len(), 1);
        assert!(TurnConstraints::new(1.0, 1.0).validate().is_empty());
    }

    #[test]
    fn test_default_drive_is_valid() {
        assert!(DriveConstraints::default().validate().is_empty());
    }

    #[test]
    fn test_validate_message_names_field() {
        let issues = DriveConstraints::new(1.0, 1.0, 1.0, -2.0).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("max_ang_accel"));
    }
}
