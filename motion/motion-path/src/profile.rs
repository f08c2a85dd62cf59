//! One-dimensional motion profiles.
//!
//! A [`MotionProfile`] is a piecewise constant-acceleration description of
//! motion along a single axis: arc length along a path, or heading during an
//! in-place turn. Two generators are provided:
//!
//! - [`generate_simple_profile`]: Rest-to-rest trapezoid (or triangle) under a
//!   single velocity/acceleration pair
//! - [`generate_path_profile`]: Rest-to-rest profile along a [`Path`] that
//!   honours each piece's limits
//!
//! # Example
//!
//! ```
//! use motion_path::profile::generate_simple_profile;
//!
//! // 10 units at up to 5 u/s and 5 u/s²: 1s ramp up, 1s cruise, 1s ramp down
//! let profile = generate_simple_profile(0.0, 10.0, 5.0, 5.0).unwrap();
//! assert!((profile.duration() - 3.0).abs() < 1e-9);
//! assert!((profile.end().x - 10.0).abs() < 1e-9);
//! ```

use crate::path::Path;
use crate::{PathError, Result};

/// Most grid intervals [`generate_path_profile`] will allocate.
pub const MAX_PROFILE_INTERVALS: f64 = 1_000_000.0;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionState {
    /// Position.
    pub x: f64,
    /// Velocity.
    pub v: f64,
    /// Acceleration.
    pub a: f64,
}

impl MotionState {
    /// Create a state.
    #[must_use]
    pub const fn new(x: f64, v: f64, a: f64) -> Self {
        Self { x, v, a }
    }

    /// State after `dt` seconds of constant acceleration.
    #[must_use]
    pub fn advance(&self, dt: f64) -> Self {
        Self::new(
            (0.5 * self.a * dt).mul_add(dt, self.v.mul_add(dt, self.x)),
            self.a.mul_add(dt, self.v),
            self.a,
        )
    }
}

/// A stretch of constant acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionSegment {
    /// State at the start of the segment.
    pub start: MotionState,
    /// Segment length in seconds.
    pub dt: f64,
}

impl MotionSegment {
    /// Create a segment.
    #[must_use]
    pub const fn new(start: MotionState, dt: f64) -> Self {
        Self { start, dt }
    }

    /// State `t` seconds into the segment (clamped to the segment).
    #[must_use]
    pub fn get(&self, t: f64) -> MotionState {
        self.start.advance(t.clamp(0.0, self.dt))
    }

    /// State at the end of the segment.
    #[must_use]
    pub fn end(&self) -> MotionState {
        self.start.advance(self.dt)
    }
}

/// A sequence of constant-acceleration segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionProfile {
    segments: Vec<MotionSegment>,
    /// Time at which each segment starts.
    starts: Vec<f64>,
    duration: f64,
}

impl MotionProfile {
    /// Create a profile from consecutive segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Degenerate`] if `segments` is empty or a segment
    /// has a negative or non-finite length.
    pub fn new(segments: Vec<MotionSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(PathError::degenerate("motion profile has no segments"));
        }

        let mut starts = Vec::with_capacity(segments.len());
        let mut duration = 0.0;
        for segment in &segments {
            if !(segment.dt.is_finite() && segment.dt >= 0.0) {
                return Err(PathError::degenerate(format!(
                    "motion segment duration {} is invalid",
                    segment.dt
                )));
            }
            starts.push(duration);
            duration += segment.dt;
        }

        Ok(Self {
            segments,
            starts,
            duration,
        })
    }

    /// A zero-length profile resting at `x`.
    #[must_use]
    pub fn stationary(x: f64) -> Self {
        Self {
            segments: vec![MotionSegment::new(MotionState::new(x, 0.0, 0.0), 0.0)],
            starts: vec![0.0],
            duration: 0.0,
        }
    }

    /// Total duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// The segments in order.
    #[must_use]
    pub fn segments(&self) -> &[MotionSegment] {
        &self.segments
    }

    /// State at time `t`, clamped to `[0, duration]`.
    #[must_use]
    pub fn get(&self, t: f64) -> MotionState {
        let t = t.clamp(0.0, self.duration);
        let idx = self
            .starts
            .partition_point(|&start| start <= t)
            .saturating_sub(1)
            .min(self.segments.len() - 1);
        self.segments[idx].get(t - self.starts[idx])
    }

    /// State at the start.
    #[must_use]
    pub fn start(&self) -> MotionState {
        self.segments[0].start
    }

    /// State at the end.
    #[must_use]
    pub fn end(&self) -> MotionState {
        self.segments[self.segments.len() - 1].end()
    }
}

fn check_limits(max_vel: f64, max_accel: f64) -> Result<()> {
    if !(max_vel.is_finite() && max_vel > 0.0) {
        return Err(PathError::invalid_constraints(format!(
            "max_vel must be positive and finite, got {max_vel}"
        )));
    }
    if !(max_accel.is_finite() && max_accel > 0.0) {
        return Err(PathError::invalid_constraints(format!(
            "max_accel must be positive and finite, got {max_accel}"
        )));
    }
    Ok(())
}

/// Generate a rest-to-rest profile from `start` to `goal`.
///
/// The profile accelerates at `max_accel` up to `max_vel`, cruises, then
/// decelerates; short moves never reach `max_vel` and form a triangle.
/// `goal` may be below `start`, in which case velocities are negative.
///
/// # Errors
///
/// Returns [`PathError::InvalidConstraints`] if either limit is not positive
/// and finite, or [`PathError::Degenerate`] if an endpoint is not finite.
pub fn generate_simple_profile(
    start: f64,
    goal: f64,
    max_vel: f64,
    max_accel: f64,
) -> Result<MotionProfile> {
    check_limits(max_vel, max_accel)?;
    if !(start.is_finite() && goal.is_finite()) {
        return Err(PathError::degenerate(format!(
            "profile endpoints must be finite, got {start} and {goal}"
        )));
    }

    let distance = (goal - start).abs();
    if distance < 1e-12 {
        return Ok(MotionProfile::stationary(start));
    }
    let sign = (goal - start).signum();

    let (peak_vel, accel_time, cruise_time) = if distance >= max_vel * max_vel / max_accel {
        let accel_time = max_vel / max_accel;
        (max_vel, accel_time, (distance - max_vel * accel_time) / max_vel)
    } else {
        let peak = (distance * max_accel).sqrt();
        (peak, peak / max_accel, 0.0)
    };

    let accel = MotionSegment::new(MotionState::new(start, 0.0, sign * max_accel), accel_time);
    let mut segments = vec![accel];

    let mut state = accel.end();
    if cruise_time > 0.0 {
        let cruise = MotionSegment::new(MotionState::new(state.x, sign * peak_vel, 0.0), cruise_time);
        state = cruise.end();
        segments.push(cruise);
    }
    segments.push(MotionSegment::new(
        MotionState::new(state.x, sign * peak_vel, -sign * max_accel),
        accel_time,
    ));

    MotionProfile::new(segments)
}

/// Generate a rest-to-rest profile along `path`.
///
/// The path is sampled every `resolution` units of arc length (at least two
/// intervals). A forward pass limits each sample's velocity by the reachable
/// speed under acceleration limits, and a backward pass by the speed from
/// which the robot can still stop. Limits come from the piece containing each
/// interval, so a slow piece slows only its own stretch.
///
/// # Errors
///
/// Returns [`PathError::InvalidConstraints`] if a piece carries unusable
/// limits or `resolution` is not positive, and [`PathError::Degenerate`] if
/// the resulting profile is malformed.
pub fn generate_path_profile(path: &Path, resolution: f64) -> Result<MotionProfile> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(PathError::invalid_constraints(format!(
            "resolution must be positive and finite, got {resolution}"
        )));
    }
    for piece in path.pieces() {
        let c = piece.constraints();
        check_limits(c.max_vel(), c.max_accel())?;
    }

    let length = path.length();
    let grid = (length / resolution).ceil();
    if grid > MAX_PROFILE_INTERVALS {
        return Err(PathError::invalid_constraints(format!(
            "resolution {resolution} needs {grid} intervals over length {length}, \
             more than {MAX_PROFILE_INTERVALS}"
        )));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let intervals = (grid as usize).max(2);
    let ds = length / intervals as f64;

    // Limits per interval, taken at the interval midpoint
    let limits: Vec<_> = (0..intervals)
        .map(|i| path.constraints_at((i as f64 + 0.5) * ds))
        .collect();

    let mut vel = vec![0.0; intervals + 1];
    for i in 1..intervals {
        vel[i] = limits[i - 1].max_vel().min(limits[i].max_vel());
    }

    // Forward pass: reachable speed
    for i in 0..intervals {
        let reachable = 2.0f64.mul_add(limits[i].max_accel() * ds, vel[i] * vel[i]).sqrt();
        vel[i + 1] = vel[i + 1].min(reachable);
    }

    // Backward pass: stoppable speed
    for i in (0..intervals).rev() {
        let stoppable = 2.0f64
            .mul_add(limits[i].max_accel() * ds, vel[i + 1] * vel[i + 1])
            .sqrt();
        vel[i] = vel[i].min(stoppable);
    }

    let mut segments = Vec::with_capacity(intervals);
    for i in 0..intervals {
        let (v0, v1) = (vel[i], vel[i + 1]);
        let mean = v0 + v1;
        if mean <= 0.0 {
            return Err(PathError::degenerate(format!(
                "profile stalls at arc length {}",
                i as f64 * ds
            )));
        }
        let dt = 2.0 * ds / mean;
        segments.push(MotionSegment::new(
            MotionState::new(i as f64 * ds, v0, (v1 - v0) / dt),
            dt,
        ));
    }

    MotionProfile::new(segments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::curve::{ArcLengthCurve, CurveKind, LineCurve};
    use crate::heading::HeadingInterpolation;
    use crate::path::PathPiece;
    use approx::assert_relative_eq;
    use motion_types::{MotionConstraints, Point2};

    fn straight(length: f64, constraints: MotionConstraints) -> Path {
        let line = LineCurve::new(Point2::new(0.0, 0.0), Point2::new(length, 0.0));
        Path::new(vec![PathPiece::new(
            ArcLengthCurve::new(CurveKind::Line(line)).unwrap(),
            HeadingInterpolation::Tangent { offset: 0.0 },
            constraints,
        )])
        .unwrap()
    }

    #[test]
    fn test_state_advance() {
        let s = MotionState::new(1.0, 2.0, 4.0).advance(0.5);
        assert_relative_eq!(s.x, 2.5);
        assert_relative_eq!(s.v, 4.0);
    }

    #[test]
    fn test_simple_triangle() {
        // 1 unit at a = 1: peak 1 u/s, 1s up, 1s down
        let p = generate_simple_profile(0.0, 1.0, 10.0, 1.0).unwrap();
        assert_eq!(p.segments().len(), 2);
        assert_relative_eq!(p.duration(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.get(1.0).v, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.end().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.end().v, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simple_negative_direction() {
        let p = generate_simple_profile(2.0, -8.0, 5.0, 5.0).unwrap();
        assert_relative_eq!(p.duration(), 3.0, epsilon = 1e-9);
        assert!(p.get(1.5).v < 0.0);
        assert_relative_eq!(p.end().x, -8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simple_zero_distance() {
        let p = generate_simple_profile(1.5, 1.5, 5.0, 5.0).unwrap();
        assert_relative_eq!(p.duration(), 0.0);
        assert_relative_eq!(p.get(3.0).x, 1.5);
    }

    #[test]
    fn test_simple_rejects_bad_limits() {
        let err = generate_simple_profile(0.0, 1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, PathError::InvalidConstraints { .. }));
        assert!(generate_simple_profile(0.0, 1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_profile_get_clamps() {
        let p = generate_simple_profile(0.0, 10.0, 5.0, 5.0).unwrap();
        assert_relative_eq!(p.get(-1.0).x, 0.0);
        assert_relative_eq!(p.get(100.0).x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_path_profile_rest_to_rest() {
        let path = straight(20.0, MotionConstraints::new(5.0, 5.0));
        let p = generate_path_profile(&path, 0.25).unwrap();
        assert_relative_eq!(p.start().v, 0.0);
        assert_relative_eq!(p.end().v, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.end().x, 20.0, epsilon = 1e-9);
        // Close to the closed-form trapezoid: 1s up, 3s cruise, 1s down
        assert_relative_eq!(p.duration(), 5.0, epsilon = 0.1);
    }

    #[test]
    fn test_path_profile_respects_max_vel() {
        let path = straight(30.0, MotionConstraints::new(4.0, 10.0));
        let p = generate_path_profile(&path, 0.25).unwrap();
        let steps = 200;
        for i in 0..=steps {
            let t = p.duration() * f64::from(i) / f64::from(steps);
            assert!(p.get(t).v <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn test_path_profile_monotone_position() {
        let path = straight(3.0, MotionConstraints::new(30.0, 30.0));
        let p = generate_path_profile(&path, 0.25).unwrap();
        let mut last = -1.0;
        for i in 0..=100 {
            let x = p.get(p.duration() * f64::from(i) / 100.0).x;
            assert!(x >= last - 1e-12);
            last = x;
        }
    }

    #[test]
    fn test_path_profile_rejects_bad_resolution() {
        let path = straight(3.0, MotionConstraints::new(30.0, 30.0));
        assert!(generate_path_profile(&path, 0.0).is_err());
        assert!(matches!(
            generate_path_profile(&path, 1e-12),
            Err(PathError::InvalidConstraints { .. })
        ));
    }
}
