//! Incremental construction of trajectories from drive commands.
//!
//! A [`TrajectoryBuilder`] is anchored at a pose and a direction of travel.
//! Each [`PathCommand`] appends one curve piece starting where the previous
//! one ended. Pieces must join smoothly: a piece whose starting direction
//! disagrees with the current end tangent is rejected with
//! [`PathError::ContinuityViolation`], and the builder is left unchanged.
//!
//! # Example
//!
//! ```
//! use motion_path::{PathCommand, TrajectoryBuilder};
//! use motion_types::{MotionConstraints, Point2, Pose2d};
//!
//! let limits = MotionConstraints::new(30.0, 30.0);
//! let mut builder = TrajectoryBuilder::new(Pose2d::new(0.0, 0.0, 0.0), 0.0, 0.25);
//!
//! builder.add(PathCommand::Forward(24.0), limits).unwrap();
//! builder.add(PathCommand::SplineTo(Point2::new(48.0, 24.0), 1.0), limits).unwrap();
//!
//! // A sharp corner cannot continue the path
//! let err = builder.add(PathCommand::LineTo(Point2::new(48.0, 0.0)), limits).unwrap_err();
//! assert!(err.is_continuity_violation());
//!
//! let trajectory = builder.build().unwrap();
//! assert!(trajectory.duration() > 0.0);
//! ```

use std::f64::consts::FRAC_PI_2;

use motion_types::{MotionConstraints, Point2, Pose2d, angle, polar};
use tracing::debug;

use crate::curve::{ArcLengthCurve, CubicHermite, CurveKind, LineCurve};
use crate::heading::HeadingInterpolation;
use crate::path::{Path, PathPiece};
use crate::profile::generate_path_profile;
use crate::trajectory::Trajectory;
use crate::{PathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angular tolerance for joining two pieces.
const CONTINUITY_EPSILON: f64 = 1e-6;

/// A single drive command that extends a path.
///
/// Line commands drive straight; spline commands curve from the current
/// direction of travel into the given end tangent. The suffix names how the
/// heading behaves along the piece:
///
/// - none: heading follows the direction of travel
/// - `ConstantHeading`: heading is held
/// - `LinearHeading`: heading turns evenly to the target pose's heading
/// - `SplineHeading`: heading eases into the target pose's heading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathCommand {
    /// Straight line to a point, heading along the line.
    LineTo(Point2<f64>),
    /// Straight line to a point, heading held.
    LineToConstantHeading(Point2<f64>),
    /// Straight line to a pose, heading interpolated linearly.
    LineToLinearHeading(Pose2d),
    /// Straight line to a pose, heading interpolated smoothly.
    LineToSplineHeading(Pose2d),
    /// Straight line to a point without turning.
    StrafeTo(Point2<f64>),
    /// Drive along the current heading.
    Forward(f64),
    /// Drive against the current heading.
    Back(f64),
    /// Strafe to the left of the current heading.
    StrafeLeft(f64),
    /// Strafe to the right of the current heading.
    StrafeRight(f64),
    /// Curve to a point, arriving along `end_tangent`.
    SplineTo(Point2<f64>, f64),
    /// Curve to a point with the heading held.
    SplineToConstantHeading(Point2<f64>, f64),
    /// Curve to a pose with the heading interpolated linearly.
    SplineToLinearHeading(Pose2d, f64),
    /// Curve to a pose with the heading interpolated smoothly.
    SplineToSplineHeading(Pose2d, f64),
}

/// Builds a [`Trajectory`] one piece at a time.
#[derive(Debug, Clone)]
pub struct TrajectoryBuilder {
    start_pose: Pose2d,
    current_pose: Pose2d,
    current_tangent: f64,
    pieces: Vec<PathPiece>,
    resolution: f64,
}

impl TrajectoryBuilder {
    /// Create a builder at `start_pose`, initially travelling along
    /// `start_tangent`. `resolution` is the arc-length grid step of the
    /// generated profile.
    #[must_use]
    pub const fn new(start_pose: Pose2d, start_tangent: f64, resolution: f64) -> Self {
        Self {
            start_pose,
            current_pose: start_pose,
            current_tangent: start_tangent,
            pieces: Vec::new(),
            resolution,
        }
    }

    /// Pose the builder was anchored at.
    #[must_use]
    pub const fn start_pose(&self) -> Pose2d {
        self.start_pose
    }

    /// Pose at the end of the pieces added so far.
    #[must_use]
    pub const fn current_pose(&self) -> Pose2d {
        self.current_pose
    }

    /// Direction of travel at the end of the pieces added so far.
    #[must_use]
    pub const fn current_tangent(&self) -> f64 {
        self.current_tangent
    }

    /// Returns `true` if no piece has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Number of pieces added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Append the piece described by `command`, limited by `constraints`.
    ///
    /// # Errors
    ///
    /// - [`PathError::ContinuityViolation`] if the piece does not start along
    ///   the current end tangent (the first piece is exempt)
    /// - [`PathError::Degenerate`] if the piece has no length
    ///
    /// The builder is unchanged when an error is returned.
    pub fn add(&mut self, command: PathCommand, constraints: MotionConstraints) -> Result<()> {
        let piece = self.make_piece(command, constraints)?;

        let start_tangent = piece.curve().start_tangent();
        if !self.pieces.is_empty()
            && !angle::heading_eq(start_tangent, self.current_tangent, CONTINUITY_EPSILON)
        {
            debug!(
                expected = self.current_tangent,
                actual = start_tangent,
                "rejecting discontinuous path piece"
            );
            return Err(PathError::continuity_violation(
                self.current_tangent,
                start_tangent,
            ));
        }

        self.current_pose = piece.pose_at(piece.length());
        self.current_tangent = piece.curve().end_tangent();
        self.pieces.push(piece);
        Ok(())
    }

    /// Build a trajectory from the pieces added so far.
    ///
    /// The builder can keep growing afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if no piece has been added, or any
    /// error from profile generation.
    pub fn build(&self) -> Result<Trajectory> {
        let path = Path::new(self.pieces.clone())?;
        let profile = generate_path_profile(&path, self.resolution)?;
        Ok(Trajectory::new(path, profile))
    }

    fn make_piece(&self, command: PathCommand, constraints: MotionConstraints) -> Result<PathPiece> {
        let pose = self.current_pose;
        let here = pose.position();

        let (curve, heading) = match command {
            PathCommand::LineTo(end) => {
                let curve = line(here, end)?;
                let offset = angle::norm_delta(pose.heading - curve.start_tangent());
                (curve, HeadingInterpolation::Tangent { offset })
            }
            PathCommand::LineToConstantHeading(end) | PathCommand::StrafeTo(end) => {
                (line(here, end)?, HeadingInterpolation::Constant(pose.heading))
            }
            PathCommand::LineToLinearHeading(end) => (
                line(here, end.position())?,
                HeadingInterpolation::linear(pose.heading, end.heading),
            ),
            PathCommand::LineToSplineHeading(end) => (
                line(here, end.position())?,
                HeadingInterpolation::spline(pose.heading, end.heading),
            ),
            PathCommand::Forward(distance) => {
                return self.make_piece(
                    PathCommand::LineToConstantHeading(here + polar(distance, pose.heading)),
                    constraints,
                );
            }
            PathCommand::Back(distance) => {
                return self.make_piece(PathCommand::Forward(-distance), constraints);
            }
            PathCommand::StrafeLeft(distance) => {
                return self.make_piece(
                    PathCommand::StrafeTo(here + polar(distance, pose.heading + FRAC_PI_2)),
                    constraints,
                );
            }
            PathCommand::StrafeRight(distance) => {
                return self.make_piece(PathCommand::StrafeLeft(-distance), constraints);
            }
            PathCommand::SplineTo(end, end_tangent) => {
                let curve = self.spline(end, end_tangent)?;
                let offset = angle::norm_delta(pose.heading - curve.start_tangent());
                (curve, HeadingInterpolation::Tangent { offset })
            }
            PathCommand::SplineToConstantHeading(end, end_tangent) => (
                self.spline(end, end_tangent)?,
                HeadingInterpolation::Constant(pose.heading),
            ),
            PathCommand::SplineToLinearHeading(end, end_tangent) => (
                self.spline(end.position(), end_tangent)?,
                HeadingInterpolation::linear(pose.heading, end.heading),
            ),
            PathCommand::SplineToSplineHeading(end, end_tangent) => (
                self.spline(end.position(), end_tangent)?,
                HeadingInterpolation::spline(pose.heading, end.heading),
            ),
        };

        Ok(PathPiece::new(curve, heading, constraints))
    }

    fn spline(&self, end: Point2<f64>, end_tangent: f64) -> Result<ArcLengthCurve> {
        let hermite = CubicHermite::from_tangents(
            self.current_pose.position(),
            self.current_tangent,
            end,
            end_tangent,
        );
        ArcLengthCurve::new(CurveKind::Spline(hermite))
    }
}

fn line(start: Point2<f64>, end: Point2<f64>) -> Result<ArcLengthCurve> {
    ArcLengthCurve::new(CurveKind::Line(LineCurve::new(start, end)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const LIMITS: MotionConstraints = MotionConstraints::new(30.0, 30.0);

    fn builder() -> TrajectoryBuilder {
        TrajectoryBuilder::new(Pose2d::new(0.0, 0.0, 0.0), 0.0, 0.25)
    }

    #[test]
    fn test_forward_and_back() {
        let mut b = builder();
        b.add(PathCommand::Forward(10.0), LIMITS).unwrap();
        assert_relative_eq!(b.current_pose().x, 10.0, epsilon = 1e-9);

        // Reversing direction is a corner
        let err = b.add(PathCommand::Back(4.0), LIMITS).unwrap_err();
        assert!(err.is_continuity_violation());
        assert_eq!(b.len(), 1);
        assert_relative_eq!(b.current_pose().x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_piece_exempt_from_continuity() {
        let mut b = builder();
        b.add(PathCommand::StrafeLeft(5.0), LIMITS).unwrap();
        let end = b.current_pose();
        assert_relative_eq!(end.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 5.0, epsilon = 1e-9);
        assert_relative_eq!(end.heading, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.current_tangent(), PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_strafe_right() {
        let mut b = builder();
        b.add(PathCommand::StrafeRight(5.0), LIMITS).unwrap();
        assert_relative_eq!(b.current_pose().y, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_lines_join() {
        let mut b = builder();
        b.add(PathCommand::LineTo(Point2::new(5.0, 0.0)), LIMITS).unwrap();
        b.add(PathCommand::LineTo(Point2::new(12.0, 0.0)), LIMITS).unwrap();
        let trajectory = b.build().unwrap();
        assert_relative_eq!(trajectory.length(), 12.0, epsilon = 1e-9);
        assert_relative_eq!(trajectory.end().x, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spline_keeps_continuity() {
        let mut b = builder();
        b.add(PathCommand::Forward(10.0), LIMITS).unwrap();
        b.add(PathCommand::SplineTo(Point2::new(20.0, 10.0), PI / 2.0), LIMITS)
            .unwrap();
        b.add(PathCommand::Forward(5.0), LIMITS).unwrap();

        let end = b.current_pose();
        assert_relative_eq!(end.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 15.0, epsilon = 1e-9);
        assert_relative_eq!(end.heading, PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_heading_reaches_target() {
        let mut b = builder();
        b.add(
            PathCommand::LineToLinearHeading(Pose2d::new(10.0, 0.0, PI / 2.0)),
            LIMITS,
        )
        .unwrap();
        let trajectory = b.build().unwrap();
        assert_relative_eq!(trajectory.end().heading, PI / 2.0, epsilon = 1e-9);
        assert_relative_eq!(trajectory.path().get(5.0).heading, PI / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut b = builder();
        let err = b.add(PathCommand::Forward(0.0), LIMITS).unwrap_err();
        assert!(matches!(err, PathError::Degenerate { .. }));
        assert!(b.is_empty());
    }

    #[test]
    fn test_build_empty_fails() {
        assert_eq!(builder().build().unwrap_err(), PathError::EmptyPath);
    }

    #[test]
    fn test_trajectory_endpoints() {
        let mut b = builder();
        b.add(PathCommand::Forward(24.0), LIMITS).unwrap();
        let t = b.build().unwrap();
        assert_relative_eq!(t.get(0.0).x, 0.0);
        assert_relative_eq!(t.get(t.duration()).x, 24.0, epsilon = 1e-9);
        assert_relative_eq!(t.get(t.duration() / 2.0).x, 12.0, epsilon = 1e-6);
    }
}
