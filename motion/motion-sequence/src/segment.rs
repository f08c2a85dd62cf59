//! The three kinds of motion a sequence is made of.
//!
//! Segments are immutable values. Attaching a marker with
//! [`Segment::with_marker`] returns a new segment of the same kind.

use motion_path::{MotionProfile, Trajectory};
use motion_types::{Marker, Pose2d, angle};

/// One step of a motion sequence.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Drive along a path.
    Path(PathSegment),
    /// Rotate in place.
    Turn(TurnSegment),
    /// Hold still.
    Wait(WaitSegment),
}

impl Segment {
    /// Time the segment takes, in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Self::Path(s) => s.duration(),
            Self::Turn(s) => s.duration(),
            Self::Wait(s) => s.duration(),
        }
    }

    /// Pose at the start of the segment.
    #[must_use]
    pub fn start_pose(&self) -> Pose2d {
        match self {
            Self::Path(s) => s.start_pose(),
            Self::Turn(s) => s.start_pose(),
            Self::Wait(s) => s.pose(),
        }
    }

    /// Pose at the end of the segment.
    #[must_use]
    pub fn end_pose(&self) -> Pose2d {
        match self {
            Self::Path(s) => s.end_pose(),
            Self::Turn(s) => s.end_pose(),
            Self::Wait(s) => s.pose(),
        }
    }

    /// Markers bound to this segment, with segment-local times.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        match self {
            Self::Path(s) => &s.markers,
            Self::Turn(s) => &s.markers,
            Self::Wait(s) => &s.markers,
        }
    }

    /// Pose `t` seconds into the segment, clamped to the segment.
    #[must_use]
    pub fn pose_at(&self, t: f64) -> Pose2d {
        match self {
            Self::Path(s) => s.trajectory.get(t),
            Self::Turn(s) => s.pose_at(t),
            Self::Wait(s) => s.pose(),
        }
    }

    /// A copy of this segment carrying one more marker.
    #[must_use]
    pub fn with_marker(&self, marker: Marker) -> Self {
        let mut next = self.clone();
        match &mut next {
            Self::Path(s) => s.markers.push(marker),
            Self::Turn(s) => s.markers.push(marker),
            Self::Wait(s) => s.markers.push(marker),
        }
        next
    }

    /// The path segment, if this is one.
    #[must_use]
    pub const fn as_path(&self) -> Option<&PathSegment> {
        match self {
            Self::Path(s) => Some(s),
            _ => None,
        }
    }

    /// The turn segment, if this is one.
    #[must_use]
    pub const fn as_turn(&self) -> Option<&TurnSegment> {
        match self {
            Self::Turn(s) => Some(s),
            _ => None,
        }
    }

    /// The wait segment, if this is one.
    #[must_use]
    pub const fn as_wait(&self) -> Option<&WaitSegment> {
        match self {
            Self::Wait(s) => Some(s),
            _ => None,
        }
    }
}

/// Driving along a trajectory.
#[derive(Debug, Clone)]
pub struct PathSegment {
    trajectory: Trajectory,
    markers: Vec<Marker>,
}

impl PathSegment {
    /// Wrap a trajectory.
    #[must_use]
    pub const fn new(trajectory: Trajectory, markers: Vec<Marker>) -> Self {
        Self {
            trajectory,
            markers,
        }
    }

    /// The trajectory driven.
    #[must_use]
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Time to drive the trajectory.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.trajectory.duration()
    }

    /// Arc length of the trajectory's path.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.trajectory.length()
    }

    /// Pose at the start.
    #[must_use]
    pub fn start_pose(&self) -> Pose2d {
        self.trajectory.start()
    }

    /// Pose at the end.
    #[must_use]
    pub fn end_pose(&self) -> Pose2d {
        self.trajectory.end()
    }

    /// Bound markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// Rotating in place.
///
/// The profile's position is the absolute heading, running from
/// `start_pose.heading` to `start_pose.heading + total_rotation`.
#[derive(Debug, Clone)]
pub struct TurnSegment {
    start_pose: Pose2d,
    total_rotation: f64,
    profile: MotionProfile,
    markers: Vec<Marker>,
}

impl TurnSegment {
    /// Create a turn by `total_rotation` radians (counter-clockwise positive).
    #[must_use]
    pub const fn new(
        start_pose: Pose2d,
        total_rotation: f64,
        profile: MotionProfile,
        markers: Vec<Marker>,
    ) -> Self {
        Self {
            start_pose,
            total_rotation,
            profile,
            markers,
        }
    }

    /// Time the turn takes.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.profile.duration()
    }

    /// Signed rotation in radians.
    #[must_use]
    pub const fn total_rotation(&self) -> f64 {
        self.total_rotation
    }

    /// The heading profile.
    #[must_use]
    pub const fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Pose before turning.
    #[must_use]
    pub const fn start_pose(&self) -> Pose2d {
        self.start_pose
    }

    /// Pose after turning, with the heading normalized.
    #[must_use]
    pub fn end_pose(&self) -> Pose2d {
        self.start_pose.rotated(self.total_rotation)
    }

    /// Pose `t` seconds into the turn.
    #[must_use]
    pub fn pose_at(&self, t: f64) -> Pose2d {
        self.start_pose
            .with_heading(angle::norm(self.profile.get(t).x))
    }

    /// Bound markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// Holding a pose for a fixed time.
#[derive(Debug, Clone)]
pub struct WaitSegment {
    pose: Pose2d,
    duration: f64,
    markers: Vec<Marker>,
}

impl WaitSegment {
    /// Create a wait at `pose` lasting `duration` seconds.
    #[must_use]
    pub const fn new(pose: Pose2d, duration: f64, markers: Vec<Marker>) -> Self {
        Self {
            pose,
            duration,
            markers,
        }
    }

    /// The pose held.
    #[must_use]
    pub const fn pose(&self) -> Pose2d {
        self.pose
    }

    /// Time waited.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// Bound markers.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion_path::profile::generate_simple_profile;
    use motion_path::{PathCommand, TrajectoryBuilder};
    use motion_types::{MarkerCallback, MotionConstraints};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn turn(from: f64, by: f64) -> Segment {
        let profile = generate_simple_profile(from, from + by, PI, PI).unwrap();
        Segment::Turn(TurnSegment::new(Pose2d::new(1.0, 2.0, from), by, profile, vec![]))
    }

    #[test]
    fn test_wait_segment() {
        let pose = Pose2d::new(3.0, 4.0, 1.0);
        let wait = Segment::Wait(WaitSegment::new(pose, 2.5, vec![]));
        assert_relative_eq!(wait.duration(), 2.5);
        assert_eq!(wait.start_pose(), pose);
        assert_eq!(wait.end_pose(), pose);
        assert_eq!(wait.pose_at(1.0), pose);
    }

    #[test]
    fn test_turn_end_heading_normalized() {
        let seg = turn(1.5 * PI, PI);
        assert_relative_eq!(seg.end_pose().heading, 0.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(seg.end_pose().x, 1.0);
        assert!(seg.duration() > 0.0);
    }

    #[test]
    fn test_turn_pose_at() {
        let seg = turn(0.0, -FRAC_PI_2);
        assert_relative_eq!(seg.pose_at(0.0).heading, 0.0);
        let end = seg.pose_at(seg.duration());
        assert_relative_eq!(end.heading, 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_path_segment_delegates() {
        let mut builder = TrajectoryBuilder::new(Pose2d::default(), 0.0, 0.25);
        builder
            .add(PathCommand::Forward(12.0), MotionConstraints::new(30.0, 30.0))
            .unwrap();
        let trajectory = builder.build().unwrap();
        let duration = trajectory.duration();
        let seg = Segment::Path(PathSegment::new(trajectory, vec![]));

        assert_relative_eq!(seg.duration(), duration);
        assert_relative_eq!(seg.end_pose().x, 12.0, epsilon = 1e-9);
        assert_relative_eq!(seg.as_path().unwrap().length(), 12.0, epsilon = 1e-9);
        assert!(seg.as_turn().is_none());
    }

    #[test]
    fn test_with_marker_leaves_original() {
        let seg = Segment::Wait(WaitSegment::new(Pose2d::default(), 1.0, vec![]));
        let marked = seg.with_marker(Marker::new(0.5, MarkerCallback::noop()));
        let twice = marked.with_marker(Marker::new(0.7, MarkerCallback::noop()));

        assert!(seg.markers().is_empty());
        assert_eq!(marked.markers().len(), 1);
        assert_eq!(twice.markers().len(), 2);
        assert_relative_eq!(twice.markers()[1].time, 0.7);
        assert!(twice.as_wait().is_some());
    }
}
