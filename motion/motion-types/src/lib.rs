//! Core value types for mobile-robot motion sequences.
//!
//! This crate provides the plain values shared by the motion crates:
//!
//! - [`Pose2d`] - Planar pose (position plus heading)
//! - [`angle`] - Heading normalization helpers
//! - [`MotionConstraints`], [`TurnConstraints`], [`DriveConstraints`] -
//!   Velocity and acceleration limits
//! - [`Marker`], [`MarkerCallback`], [`Producer`] - Deferred callbacks and the
//!   functions that decide when they fire
//!
//! # Example
//!
//! ```
//! use motion_types::{DriveConstraints, Pose2d};
//! use std::f64::consts::FRAC_PI_2;
//!
//! let start = Pose2d::new(0.0, 0.0, FRAC_PI_2);
//! let drive = DriveConstraints::new(30.0, 30.0, 3.0, 3.0);
//!
//! assert!(drive.validate().is_empty());
//! assert!((start.heading_vec().y - 1.0).abs() < 1e-12);
//! ```
//!
//! # Units
//!
//! Lengths are in whatever unit the caller uses consistently (the original
//! field tooling works in inches); angles are always radians and times are
//! seconds.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for poses and constraints

#![doc(html_root_url = "https://docs.rs/motion-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

pub mod angle;
pub mod constraint;
pub mod marker;
pub mod pose;

pub use constraint::{DriveConstraints, MotionConstraints, TurnConstraints};
pub use marker::{Marker, MarkerCallback, Producer};
pub use pose::{Pose2d, polar};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_drive_constraints_split() {
        let drive = DriveConstraints::new(40.0, 20.0, PI, PI / 2.0);

        let motion = drive.motion();
        assert_relative_eq!(motion.max_vel(), 40.0);
        assert_relative_eq!(motion.max_accel(), 20.0);

        let turn = drive.turn();
        assert_relative_eq!(turn.max_ang_vel(), PI);
        assert_relative_eq!(turn.max_ang_accel(), PI / 2.0);
    }

    #[test]
    fn test_pose_advance_keeps_heading_normalized() {
        let pose = Pose2d::new(1.0, 2.0, 1.5 * PI);
        let turned = pose.rotated(PI);

        assert_relative_eq!(turned.heading, 0.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(turned.x, 1.0);
        assert_relative_eq!(turned.y, 2.0);
    }
}
